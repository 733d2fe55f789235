//! Byte classification.
//!
//! Every predicate here is pure: it looks at bytes and answers a question,
//! it never moves a cursor. The scanner owns all cursor state.

/// Whitespace as C's `isspace` sees it in the "C" locale.
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

pub fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

pub fn is_octal_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

/// A C "nondigit": the bytes that may start an identifier.
pub fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

pub fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || is_digit(b)
}

/// Bytes that may appear unescaped inside a string literal.
///
/// Printable ASCII only; the quote and backslash need escaping, control
/// bytes (newline included) and anything above 0x7E are rejected.
pub fn is_safe_string_char(b: u8) -> bool {
    matches!(b, 0x20..=0x7e) && b != b'"' && b != b'\\'
}

/// Peek for a universal character name at `at`.
///
/// Returns the full length of the escape (6 for `\uXXXX`, 10 for
/// `\UXXXXXXXX`) when the bytes have that shape, `None` otherwise.
pub fn is_universal_character_name(bytes: &[u8], at: usize) -> Option<usize> {
    if bytes.get(at) != Some(&b'\\') {
        return None;
    }
    let digits = match bytes.get(at + 1) {
        Some(b'u') => 4,
        Some(b'U') => 8,
        _ => return None,
    };
    let start = at + 2;
    let hex = bytes.get(start..start + digits)?;
    if hex.iter().all(|&b| is_hex_digit(b)) {
        Some(2 + digits)
    } else {
        None
    }
}

/// Numeric value of a hex digit. Callers check `is_hex_digit` first.
pub(crate) fn hex_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => u32::from(b - b'0'),
        b'a'..=b'f' => u32::from(b - b'a' + 10),
        b'A'..=b'F' => u32::from(b - b'A' + 10),
        _ => 0,
    }
}
