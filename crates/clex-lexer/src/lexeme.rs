//! Punctuator and keyword tables.
//!
//! Each enum and its table are generated from one list, so a variant
//! cannot exist without its entry. Entries sit in discriminant order and
//! `kind as usize` indexes its own entry; that is checked at compile time
//! at the bottom of this file.

use std::fmt;

/// A punctuator table entry: stable diagnostic name plus source spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunctuatorDef {
    pub name: &'static str,
    pub literal: &'static str,
    pub kind: Punctuator,
}

macro_rules! punctuators {
    ($($variant:ident => $name:literal, $literal:literal;)*) => {
        /// Operators and structural symbols.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Punctuator {
            $($variant,)*
        }

        impl Punctuator {
            pub const COUNT: usize = [$(Punctuator::$variant),*].len();
        }

        pub const PUNCTUATORS: [PunctuatorDef; Punctuator::COUNT] = [
            $(PunctuatorDef {
                name: $name,
                literal: $literal,
                kind: Punctuator::$variant,
            },)*
        ];
    };
}

macro_rules! keywords {
    ($($variant:ident => $spelling:literal;)*) => {
        /// Reserved words (C99).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            pub const COUNT: usize = [$(Keyword::$variant),*].len();
        }

        pub const KEYWORDS: [(&str, Keyword); Keyword::COUNT] = [
            $(($spelling, Keyword::$variant),)*
        ];
    };
}

punctuators! {
    LBracket => "LBRACKET", "[";
    RBracket => "RBRACKET", "]";
    LParen => "LPAREN", "(";
    RParen => "RPAREN", ")";
    LBrace => "LBRACE", "{";
    RBrace => "RBRACE", "}";
    Dot => "DOT", ".";
    Arrow => "ARROW", "->";
    PlusPlus => "PLUSPLUS", "++";
    MinusMinus => "MINUSMINUS", "--";
    Ampersand => "AMPERSAND", "&";
    Star => "STAR", "*";
    Plus => "PLUS", "+";
    Minus => "MINUS", "-";
    Tilde => "TILDE", "~";
    Bang => "BANG", "!";
    Slash => "SLASH", "/";
    Percent => "PERCENT", "%";
    LShift => "LSHIFT", "<<";
    RShift => "RSHIFT", ">>";
    Less => "LESS", "<";
    Greater => "GREATER", ">";
    LessEq => "LESSEQ", "<=";
    GreaterEq => "GREATEREQ", ">=";
    EqualEqual => "EQUALEQUAL", "==";
    NotEqual => "NOTEQUAL", "!=";
    Caret => "CARET", "^";
    Pipe => "PIPE", "|";
    And => "AND", "&&";
    Or => "OR", "||";
    Question => "QUESTION", "?";
    Colon => "COLON", ":";
    Semicolon => "SEMICOLON", ";";
    Ellipsis => "ELLIPSIS", "...";
    Equal => "EQUAL", "=";
    StarEq => "STAREQ", "*=";
    SlashEq => "SLASHEQ", "/=";
    PercentEq => "PERCENTEQ", "%=";
    PlusEq => "PLUSEQ", "+=";
    MinusEq => "MINUSEQ", "-=";
    LShiftEq => "LSHIFTEQ", "<<=";
    RShiftEq => "RSHIFTEQ", ">>=";
    AmpersandEq => "AMPERSANDEQ", "&=";
    CaretEq => "CARETEQ", "^=";
    PipeEq => "PIPEEQ", "|=";
    Comma => "COMMA", ",";
    Hash => "HASH", "#";
    HashHash => "HASHHASH", "##";
    // Digraphs
    LBracketDigraph => "LBRACKET_DIGRAPH", "<:";
    RBracketDigraph => "RBRACKET_DIGRAPH", ":>";
    LBraceDigraph => "LBRACE_DIGRAPH", "<%";
    RBraceDigraph => "RBRACE_DIGRAPH", "%>";
    HashDigraph => "HASH_DIGRAPH", "%:";
    HashHashDigraph => "HASHHASH_DIGRAPH", "%:%:";
}

impl Punctuator {
    fn def(self) -> PunctuatorDef {
        PUNCTUATORS[self as usize]
    }

    /// Stable upper-case name used in token listings and diagnostics.
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// The spelling in source.
    pub fn literal(self) -> &'static str {
        self.def().literal
    }

    /// Number of bytes the punctuator occupies in source.
    pub fn byte_len(self) -> usize {
        self.literal().len()
    }
}

impl fmt::Display for Punctuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

keywords! {
    Auto => "auto";
    Break => "break";
    Case => "case";
    Char => "char";
    Const => "const";
    Continue => "continue";
    Default => "default";
    Do => "do";
    Double => "double";
    Else => "else";
    Enum => "enum";
    Extern => "extern";
    Float => "float";
    For => "for";
    Goto => "goto";
    If => "if";
    Inline => "inline";
    Int => "int";
    Long => "long";
    Register => "register";
    Restrict => "restrict";
    Return => "return";
    Short => "short";
    Signed => "signed";
    Sizeof => "sizeof";
    Static => "static";
    Struct => "struct";
    Switch => "switch";
    Typedef => "typedef";
    Union => "union";
    Unsigned => "unsigned";
    Void => "void";
    Volatile => "volatile";
    While => "while";
    Bool => "_Bool";
    Complex => "_Complex";
    Imaginary => "_Imaginary";
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        KEYWORDS[self as usize].0
    }

    pub fn byte_len(self) -> usize {
        self.as_str().len()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Table integrity: entries out of discriminant order, or an empty
// spelling, fail the build here instead of mis-displaying at run time.
const _: () = {
    let mut i = 0;
    while i < PUNCTUATORS.len() {
        assert!(
            PUNCTUATORS[i].kind as usize == i,
            "PUNCTUATORS is out of discriminant order"
        );
        assert!(!PUNCTUATORS[i].literal.is_empty(), "empty punctuator literal");
        i += 1;
    }
    let mut k = 0;
    while k < KEYWORDS.len() {
        assert!(
            KEYWORDS[k].1 as usize == k,
            "KEYWORDS is out of discriminant order"
        );
        assert!(!KEYWORDS[k].0.is_empty(), "empty keyword spelling");
        k += 1;
    }
};
