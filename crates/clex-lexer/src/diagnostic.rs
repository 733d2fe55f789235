//! Diagnostic rendering and delivery.
//!
//! A diagnostic echoes the offending source line prefixed by its line
//! number, then puts a caret under the offending column:
//!
//! ```text
//! 3 char *s = "abc;
//!             ^
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::LexError;

/// A lexical error together with the source line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub error: LexError,
    /// The offending line, without its terminator.
    pub source_line: String,
    caret_indent: String,
}

impl Diagnostic {
    /// Build a diagnostic for `error`, where `line_start` is the byte index
    /// at which the error's line begins in `source`.
    pub fn new(error: LexError, source: &[u8], line_start: usize) -> Self {
        let line_start = line_start.min(source.len());
        let rest = &source[line_start..];
        let line_end = rest
            .iter()
            .position(|&b| b == b'\n' || b == 0)
            .unwrap_or(rest.len());
        let mut line = &rest[..line_end];
        if let [head @ .., b'\r'] = line {
            line = head;
        }

        // Tabs are copied so the caret lines up under tab-indented code;
        // UTF-8 continuation bytes take no column of their own.
        let prefix_len = error.column.saturating_sub(1).min(line.len());
        let caret_indent = line[..prefix_len]
            .iter()
            .filter(|&&b| b & 0xc0 != 0x80)
            .map(|&b| if b == b'\t' { '\t' } else { ' ' })
            .collect();

        Self {
            error,
            source_line: String::from_utf8_lossy(line).into_owned(),
            caret_indent,
        }
    }

    /// The two-line `"<line> <text>"` / caret rendering.
    pub fn render(&self) -> String {
        let number = self.error.line.to_string();
        let pad = " ".repeat(number.len() + 1);
        format!(
            "{number} {}\n{pad}{}^",
            self.source_line, self.caret_indent
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}\n{}", self.error, self.render())
    }
}

/// Destination for diagnostics produced during a scan.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Writes each diagnostic as text and counts them.
#[derive(Debug)]
pub struct WriteSink<W> {
    out: W,
    reported: usize,
}

impl WriteSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriteSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, reported: 0 }
    }

    /// Number of diagnostics reported so far.
    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticSink for WriteSink<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.reported += 1;
        if let Err(e) = writeln!(self.out, "{diagnostic}") {
            tracing::warn!(error = %e, "failed to write diagnostic");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LexErrorKind;
    use pretty_assertions::assert_eq;

    fn error(kind: LexErrorKind, offset: usize, line: usize, column: usize) -> LexError {
        LexError {
            kind,
            offset,
            line,
            column,
        }
    }

    #[test]
    fn test_render_first_line() {
        let src = b"x = \"abc\ny";
        let d = Diagnostic::new(error(LexErrorKind::UnterminatedString, 4, 1, 5), src, 0);
        assert_eq!(d.source_line, "x = \"abc");
        assert_eq!(d.render(), "1 x = \"abc\n      ^");
    }

    #[test]
    fn test_render_later_line() {
        let src = b"int a;\nint $b;\n";
        let d = Diagnostic::new(error(LexErrorKind::UnknownCharacter(b'$'), 11, 2, 5), src, 7);
        assert_eq!(d.render(), "2 int $b;\n      ^");
    }

    #[test]
    fn test_render_keeps_tabs_and_strips_cr() {
        let src = b"\t@\r\n";
        let d = Diagnostic::new(error(LexErrorKind::UnknownCharacter(b'@'), 1, 1, 2), src, 0);
        assert_eq!(d.render(), "1 \t@\n  \t^");
    }

    #[test]
    fn test_render_wide_line_number() {
        let src = b"`";
        let d = Diagnostic::new(error(LexErrorKind::UnknownCharacter(b'`'), 0, 12, 1), src, 0);
        assert_eq!(d.render(), "12 `\n   ^");
    }

    #[test]
    fn test_display_has_summary() {
        let d = Diagnostic::new(error(LexErrorKind::UnknownCharacter(b'@'), 0, 1, 1), b"@", 0);
        assert_eq!(
            d.to_string(),
            "error: Lexer error at line 1, column 1: unknown character '@'\n1 @\n  ^"
        );
    }

    #[test]
    fn test_write_sink_counts() {
        let mut sink = WriteSink::new(Vec::new());
        let d = Diagnostic::new(error(LexErrorKind::UnknownCharacter(b'@'), 0, 1, 1), b"@", 0);
        sink.report(d.clone());
        sink.report(d);
        assert_eq!(sink.reported(), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.matches("1 @\n  ^\n").count(), 2);
    }
}
