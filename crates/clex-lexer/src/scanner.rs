use crate::chars::{
    hex_value, is_digit, is_hex_digit, is_ident_continue, is_ident_start, is_octal_digit,
    is_safe_string_char, is_space, is_universal_character_name,
};
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::lexeme::{Punctuator, KEYWORDS};
use crate::stream::TokenStream;
use crate::token::{Span, Token, TokenKind};
use crate::{LexError, LexErrorKind};

/// Result of scanning one buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexed {
    pub tokens: TokenStream,
    pub diagnostics: Vec<Diagnostic>,
}

/// Where scanning picks up again after a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resync {
    /// Skip the offending byte.
    Byte,
    /// Walk forward from `from`, stepping over `\x` pairs, to the closing
    /// delimiter (consumed) or the end of the line.
    Delimiter { from: usize, delimiter: u8 },
    /// Resume at a byte index the matcher already knows.
    At(usize),
}

impl Resync {
    fn skip_to(from: usize, delimiter: u8) -> Self {
        Resync::Delimiter { from, delimiter }
    }
}

/// A lexical defect on its way from a matcher to the scan loop.
#[derive(Debug)]
struct Defect {
    error: LexError,
    resync: Resync,
}

impl Defect {
    fn new(error: LexError, resync: Resync) -> Self {
        Self { error, resync }
    }
}

/// A decoded escape sequence.
enum Escaped {
    Byte(u8),
    Scalar(char),
}

/// Fraction digits kept by [`Scanner::match_number`]; later ones are
/// below `f64` precision and are skipped.
const FRACTION_DIGITS: i32 = 18;

/// Digits accumulated by [`Scanner::digits`].
struct Digits {
    value: i64,
    end: usize,
    count: i32,
    overflow: bool,
}

/// Source scanner for the C-like language.
///
/// Works on raw bytes. Each call to [`Scanner::scan`] runs one pass over
/// the whole buffer; a NUL byte ends the buffer early, like the terminator
/// of a C string.
///
/// Matchers run in a fixed order: punctuator, keyword, string literal,
/// character constant, identifier, number. A matcher either consumes input
/// and appends exactly one token, returns "no match" with the cursor
/// untouched, or returns a defect that the scan loop turns into a
/// diagnostic before resynchronizing.
pub struct Scanner<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    tokens: TokenStream,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            tokens: TokenStream::new(),
        }
    }

    /// Tokenize the entire source, collecting diagnostics.
    pub fn tokenize(source: &[u8]) -> Lexed {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let tokens = Scanner::tokenize_with(source, &mut diagnostics);
        Lexed {
            tokens,
            diagnostics,
        }
    }

    /// Tokenize the entire source, sending diagnostics to `sink` as they occur.
    pub fn tokenize_with(source: &[u8], sink: &mut dyn DiagnosticSink) -> TokenStream {
        let mut scanner = Scanner::new(source);
        scanner.scan(sink);
        scanner.into_tokens()
    }

    /// Give up the scanner, keeping the tokens it produced.
    pub fn into_tokens(self) -> TokenStream {
        self.tokens
    }

    /// Scan from the cursor to the end of the buffer.
    ///
    /// Every defect is reported to `sink` once, then the cursor moves past
    /// it and the scan continues.
    pub fn scan(&mut self, sink: &mut dyn DiagnosticSink) {
        tracing::debug!(bytes = self.source.len(), "scan started");
        let mut reported = 0usize;

        while let Err(defect) = self.scan_tokens() {
            reported += 1;
            sink.report(Diagnostic::new(
                defect.error.clone(),
                self.source,
                self.line_start,
            ));
            self.recover(&defect);
        }

        tracing::debug!(
            tokens = self.tokens.len(),
            diagnostics = reported,
            "scan finished"
        );
    }

    /// Scan all tokens until the end, or until the first defect.
    fn scan_tokens(&mut self) -> Result<(), Defect> {
        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                return Ok(());
            }
            self.scan_token()?;
        }
    }

    /// Scan the next token.
    fn scan_token(&mut self) -> Result<(), Defect> {
        if self.match_punctuator()
            || self.match_keyword()
            || self.match_string()?
            || self.match_char()?
            || self.match_identifier()
            || self.match_number()?
        {
            return Ok(());
        }

        let b = self.peek();
        Err(Defect::new(
            self.error_at(LexErrorKind::UnknownCharacter(b), self.pos),
            Resync::Byte,
        ))
    }

    /// Move the cursor past a defect. Always moves strictly forward.
    fn recover(&mut self, defect: &Defect) {
        let resume = match defect.resync {
            Resync::Byte => defect.error.offset + 1,
            Resync::Delimiter { from, delimiter } => self.skip_literal(from, delimiter),
            Resync::At(pos) => pos,
        };

        let resume = resume.max(self.pos + 1).min(self.source.len());
        tracing::trace!(
            kind = ?defect.error.kind,
            from = self.pos,
            to = resume,
            "resynchronized"
        );
        self.pos = resume;
    }

    /// End of a broken literal: just past its closing `delimiter`, or at
    /// the newline or end of buffer that cut it short. Escape pairs are
    /// stepped over, so an escaped delimiter does not close the literal.
    fn skip_literal(&self, from: usize, delimiter: u8) -> usize {
        let mut i = from;
        loop {
            match self.byte_at(i) {
                b'\n' => return i,
                _ if self.is_end_at(i) => return i,
                b if b == delimiter => return i + 1,
                b'\\' if self.byte_at(i + 1) != b'\n' && !self.is_end_at(i + 1) => i += 2,
                _ => i += 1,
            }
        }
    }

    // --- Whitespace ---

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && is_space(self.peek()) {
            if self.peek() == b'\n' {
                self.line += 1;
                self.line_start = self.pos + 1;
            }
            self.pos += 1;
        }
    }

    // --- Matchers ---

    fn match_punctuator(&mut self) -> bool {
        let Some(kind) = longest_punctuator(self.rest()) else {
            return false;
        };
        let start = self.pos;
        self.pos += kind.byte_len();
        self.push(TokenKind::Punctuator(kind), start);
        true
    }

    /// Exact literal match plus a word boundary after it, so `iffy` is not
    /// `if` followed by `fy`. Every keyword is tried: a rejected `do` must
    /// not hide `double`.
    fn match_keyword(&mut self) -> bool {
        let rest = self.rest();
        let found = KEYWORDS
            .iter()
            .find(|(literal, _)| {
                rest.starts_with(literal.as_bytes())
                    && self.is_word_boundary(self.pos + literal.len())
            })
            .map(|&(_, keyword)| keyword);
        let Some(keyword) = found else {
            return false;
        };

        let start = self.pos;
        self.pos += keyword.byte_len();
        self.push(TokenKind::Keyword(keyword), start);
        true
    }

    /// `"..."` or `L"..."`. The value excludes the quotes and the prefix.
    fn match_string(&mut self) -> Result<bool, Defect> {
        let start = self.pos;
        let mut i = start;
        if self.byte_at(i) == b'L' {
            i += 1;
        }
        if self.byte_at(i) != b'"' {
            return Ok(false);
        }
        let quote = i;
        i += 1;

        let mut value = String::new();
        loop {
            let b = self.byte_at(i);
            if b == b'"' {
                break;
            }
            if b == b'\\' {
                let (escaped, next) = self
                    .escape(i)
                    .map_err(|e| Defect::new(e, Resync::skip_to(i, b'"')))?;
                match escaped {
                    Escaped::Byte(byte) => value.push(char::from(byte)),
                    Escaped::Scalar(c) => value.push(c),
                }
                i = next;
            } else if is_safe_string_char(b) {
                value.push(char::from(b));
                i += 1;
            } else if b == b'\n' || b == b'\r' || self.is_end_at(i) {
                return Err(Defect::new(
                    self.error_at(LexErrorKind::UnterminatedString, quote),
                    Resync::At(i),
                ));
            } else {
                return Err(Defect::new(
                    self.error_at(LexErrorKind::InvalidStringCharacter(b), i),
                    Resync::skip_to(i, b'"'),
                ));
            }
        }

        self.pos = i + 1; // closing quote
        self.push(TokenKind::StringLiteral(value), start);
        Ok(true)
    }

    /// `'c'`, `'\n'`, `L'c'`. The empty constant `''` is the NUL byte.
    fn match_char(&mut self) -> Result<bool, Defect> {
        let start = self.pos;
        let mut i = start;
        if self.byte_at(i) == b'L' {
            i += 1;
        }
        if self.byte_at(i) != b'\'' {
            return Ok(false);
        }
        let quote = i;
        i += 1;

        let value = match self.byte_at(i) {
            b'\'' => 0,
            b'\\' => {
                let (escaped, next) = self
                    .escape(i)
                    .map_err(|e| Defect::new(e, Resync::skip_to(i, b'\'')))?;
                match escaped {
                    Escaped::Byte(byte) => {
                        i = next;
                        byte
                    }
                    // A character constant holds a single byte.
                    Escaped::Scalar(_) => {
                        return Err(Defect::new(
                            self.error_at(LexErrorKind::InvalidEscape, i),
                            Resync::skip_to(i, b'\''),
                        ))
                    }
                }
            }
            b'\n' | b'\r' => return Err(self.unterminated_char(quote, Resync::At(i))),
            _ if self.is_end_at(i) => return Err(self.unterminated_char(quote, Resync::At(i))),
            b => {
                i += 1;
                b
            }
        };

        if self.byte_at(i) != b'\'' {
            return Err(self.unterminated_char(quote, Resync::skip_to(i, b'\'')));
        }

        self.pos = i + 1;
        self.push(TokenKind::CharConstant(value), start);
        Ok(true)
    }

    /// Identifier bytes and universal character names, kept as spelled.
    fn match_identifier(&mut self) -> bool {
        let start = self.pos;
        let mut i = start;
        loop {
            let b = self.byte_at(i);
            let ident_byte = if i == start {
                is_ident_start(b)
            } else {
                is_ident_continue(b)
            };
            if ident_byte {
                i += 1;
            } else if let Some(len) = is_universal_character_name(self.source, i) {
                i += len;
            } else {
                break;
            }
        }

        if i == start {
            return false;
        }

        let name = String::from_utf8_lossy(&self.source[start..i]).into_owned();
        self.pos = i;
        self.push(TokenKind::Identifier(name), start);
        true
    }

    /// Decimal integer, or `int.frac` combined as
    /// `int + frac / 10^digits`. The fraction is decoded with that rule on
    /// purpose and carries its rounding error. Only the first
    /// [`FRACTION_DIGITS`] fraction digits count, zeros included.
    fn match_number(&mut self) -> Result<bool, Defect> {
        let start = self.pos;
        if !is_digit(self.peek()) {
            return Ok(false);
        }

        let integer = self.digits(start, i32::MAX);
        let mut end = integer.end;
        let mut kind = TokenKind::IntegerConstant(integer.value);

        if self.byte_at(end) == b'.' && is_digit(self.byte_at(end + 1)) {
            let fraction = self.digits(end + 1, FRACTION_DIGITS);
            end = fraction.end;
            let value =
                integer.value as f64 + fraction.value as f64 / 10f64.powi(fraction.count);
            kind = TokenKind::NumberConstant(value);
        }

        if integer.overflow {
            return Err(Defect::new(
                self.error_at(LexErrorKind::IntegerOverflow, start),
                Resync::At(end),
            ));
        }

        self.pos = end;
        self.push(kind, start);
        Ok(true)
    }

    // --- Literal helpers ---

    /// Decode the escape sequence whose backslash is at `at`.
    /// Returns the decoded value and the index just past the sequence.
    fn escape(&self, at: usize) -> Result<(Escaped, usize), LexError> {
        let next = self.byte_at(at + 1);
        let simple = match next {
            b'\'' | b'"' | b'?' | b'\\' => Some(next),
            b'a' => Some(0x07),
            b'b' => Some(0x08),
            b'f' => Some(0x0c),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'v' => Some(0x0b),
            _ => None,
        };
        if let Some(byte) = simple {
            return Ok((Escaped::Byte(byte), at + 2));
        }

        if is_octal_digit(next) {
            let mut i = at + 1;
            let mut value: u32 = 0;
            while i < at + 4 && is_octal_digit(self.byte_at(i)) {
                value = value * 8 + u32::from(self.byte_at(i) - b'0');
                i += 1;
            }
            return Ok((Escaped::Byte(value as u8), i));
        }

        if next == b'x' {
            let mut i = at + 2;
            let mut value: u32 = 0;
            while is_hex_digit(self.byte_at(i)) {
                value = value.wrapping_mul(16).wrapping_add(hex_value(self.byte_at(i)));
                i += 1;
            }
            if i == at + 2 {
                return Err(self.error_at(LexErrorKind::InvalidEscape, at));
            }
            return Ok((Escaped::Byte(value as u8), i));
        }

        if let Some(len) = is_universal_character_name(self.source, at) {
            let code = self.source[at + 2..at + len]
                .iter()
                .fold(0u32, |acc, &b| acc * 16 + hex_value(b));
            return match char::from_u32(code) {
                Some(c) => Ok((Escaped::Scalar(c), at + len)),
                None => Err(self.error_at(LexErrorKind::InvalidEscape, at)),
            };
        }

        Err(self.error_at(LexErrorKind::InvalidEscape, at))
    }

    /// Accumulate decimal digits from `at`, skipping `_` separators that
    /// sit between two digits. Digits past `max_count`, or past the first
    /// one that overflows `i64`, are scanned but not accumulated.
    fn digits(&self, at: usize, max_count: i32) -> Digits {
        let mut digits = Digits {
            value: 0,
            end: at,
            count: 0,
            overflow: false,
        };
        while is_digit(self.byte_at(digits.end)) {
            let d = i64::from(self.byte_at(digits.end) - b'0');
            if !digits.overflow && digits.count < max_count {
                match digits.value.checked_mul(10).and_then(|v| v.checked_add(d)) {
                    Some(v) => {
                        digits.value = v;
                        digits.count += 1;
                    }
                    None => digits.overflow = true,
                }
            }
            digits.end += 1;
            if self.byte_at(digits.end) == b'_' && is_digit(self.byte_at(digits.end + 1)) {
                digits.end += 1;
            }
        }
        digits
    }

    fn unterminated_char(&self, quote: usize, resync: Resync) -> Defect {
        Defect::new(self.error_at(LexErrorKind::UnterminatedChar, quote), resync)
    }

    // --- Helpers ---

    fn push(&mut self, kind: TokenKind, start: usize) {
        let span = Span::new(start, self.pos, self.line, start - self.line_start + 1);
        self.tokens.push(Token::new(kind, span));
    }

    fn error_at(&self, kind: LexErrorKind, offset: usize) -> LexError {
        LexError {
            kind,
            offset,
            line: self.line,
            column: offset - self.line_start + 1,
        }
    }

    fn is_word_boundary(&self, at: usize) -> bool {
        !is_ident_continue(self.byte_at(at))
            && is_universal_character_name(self.source, at).is_none()
    }

    fn rest(&self) -> &'a [u8] {
        &self.source[self.pos.min(self.source.len())..]
    }

    fn byte_at(&self, at: usize) -> u8 {
        self.source.get(at).copied().unwrap_or(0)
    }

    fn peek(&self) -> u8 {
        self.byte_at(self.pos)
    }

    fn is_end_at(&self, at: usize) -> bool {
        self.byte_at(at) == 0
    }

    fn is_at_end(&self) -> bool {
        self.is_end_at(self.pos)
    }
}

/// The longest punctuator at the start of `bytes`, if any.
///
/// Dispatches on the first byte and looks ahead, longer spellings first:
/// at `<<=` this is `LShiftEq`, never `LShift` or `Less`.
pub fn longest_punctuator(bytes: &[u8]) -> Option<Punctuator> {
    use Punctuator::*;

    let at = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let (b1, b2, b3) = (at(1), at(2), at(3));

    let kind = match at(0) {
        b'[' => LBracket,
        b']' => RBracket,
        b'(' => LParen,
        b')' => RParen,
        b'{' => LBrace,
        b'}' => RBrace,
        b'.' if b1 == b'.' && b2 == b'.' => Ellipsis,
        b'.' => Dot,
        b'-' => match b1 {
            b'>' => Arrow,
            b'-' => MinusMinus,
            b'=' => MinusEq,
            _ => Minus,
        },
        b'+' => match b1 {
            b'+' => PlusPlus,
            b'=' => PlusEq,
            _ => Plus,
        },
        b'&' => match b1 {
            b'&' => And,
            b'=' => AmpersandEq,
            _ => Ampersand,
        },
        b'*' if b1 == b'=' => StarEq,
        b'*' => Star,
        b'~' => Tilde,
        b'!' if b1 == b'=' => NotEqual,
        b'!' => Bang,
        b'/' if b1 == b'=' => SlashEq,
        b'/' => Slash,
        b'%' => match (b1, b2, b3) {
            (b':', b'%', b':') => HashHashDigraph,
            (b':', _, _) => HashDigraph,
            (b'=', _, _) => PercentEq,
            (b'>', _, _) => RBraceDigraph,
            _ => Percent,
        },
        b'<' => match (b1, b2) {
            (b'<', b'=') => LShiftEq,
            (b'<', _) => LShift,
            (b'=', _) => LessEq,
            (b':', _) => LBracketDigraph,
            (b'%', _) => LBraceDigraph,
            _ => Less,
        },
        b'>' => match (b1, b2) {
            (b'>', b'=') => RShiftEq,
            (b'>', _) => RShift,
            (b'=', _) => GreaterEq,
            _ => Greater,
        },
        b'=' if b1 == b'=' => EqualEqual,
        b'=' => Equal,
        b'^' if b1 == b'=' => CaretEq,
        b'^' => Caret,
        b'|' => match b1 {
            b'|' => Or,
            b'=' => PipeEq,
            _ => Pipe,
        },
        b'?' => Question,
        b':' if b1 == b'>' => RBracketDigraph,
        b':' => Colon,
        b';' => Semicolon,
        b',' => Comma,
        b'#' if b1 == b'#' => HashHash,
        b'#' => Hash,
        _ => return None,
    };
    Some(kind)
}

/// Scan `source` in independent chunks of `chunk_size` bytes, one token
/// stream per chunk. Diagnostics from every chunk go to `sink`.
///
/// Nothing carries over between chunks: line numbers, columns and spans
/// restart in each one, and a token split by a chunk boundary comes out
/// as two pieces. A `chunk_size` of 0 scans the whole buffer as one chunk.
pub fn scan_chunks(
    source: &[u8],
    chunk_size: usize,
    sink: &mut dyn DiagnosticSink,
) -> Vec<TokenStream> {
    if chunk_size == 0 {
        return vec![Scanner::tokenize_with(source, sink)];
    }
    source
        .chunks(chunk_size)
        .map(|chunk| Scanner::tokenize_with(chunk, sink))
        .collect()
}
