//! Protocol codec
//!
//! Escaping and unescaping for the wire alphabet.
//!
//! Both functions are total: any input string maps to some output string,
//! and `unescape(escape(x)) == x` holds for every `x`. The escape pass
//! walks the input one character at a time, so a backslash produced by an
//! earlier substitution can never be re-escaped by a later one.

/// Escape a string for the wire
///
/// Replaces the nine reserved characters with their two-character escape
/// sequences. The output never contains a raw reserved character.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '|' => out.push_str("\\p"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0B' => out.push_str("\\v"),
            '\x0C' => out.push_str("\\f"),
            ' ' => out.push_str("\\s"),
            _ => out.push(c),
        }
    }
    out
}

/// Unescape a wire string
///
/// Resolves every two-character escape sequence back to its original
/// character. Unknown escape sequences are kept verbatim (backslash
/// included), as is a lone trailing backslash, so the function is total
/// over arbitrary input.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('p') => out.push('|'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0B'),
            Some('f') => out.push('\x0C'),
            Some('s') => out.push(' '),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
