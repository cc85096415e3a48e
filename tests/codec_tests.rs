//! Codec Tests
//!
//! Tests for wire escaping and unescaping.

use queryline::protocol::{escape, unescape};

// =============================================================================
// Escape Tests
// =============================================================================

#[test]
fn test_escape_each_special_character() {
    assert_eq!(escape("\\"), "\\\\");
    assert_eq!(escape("/"), "\\/");
    assert_eq!(escape("|"), "\\p");
    assert_eq!(escape("\n"), "\\n");
    assert_eq!(escape("\r"), "\\r");
    assert_eq!(escape("\t"), "\\t");
    assert_eq!(escape("\x0B"), "\\v");
    assert_eq!(escape("\x0C"), "\\f");
    assert_eq!(escape(" "), "\\s");
}

#[test]
fn test_escape_plain_text_unchanged() {
    assert_eq!(escape("serveradmin"), "serveradmin");
    assert_eq!(escape("abc123_!?"), "abc123_!?");
    assert_eq!(escape(""), "");
}

#[test]
fn test_escape_mixed_text() {
    assert_eq!(escape("hello world"), "hello\\sworld");
    assert_eq!(escape("a/b|c\\d"), "a\\/b\\pc\\\\d");
}

#[test]
fn test_escape_backslash_is_not_double_processed() {
    // A backslash in the input must not have its escape re-escaped
    assert_eq!(escape("\\s"), "\\\\s");
    assert_eq!(escape("\\n"), "\\\\n");
}

#[test]
fn test_escape_output_has_no_raw_specials() {
    let input = "a b/c|d\\e\nf\rg\th\x0Bi\x0Cj";
    let escaped = escape(input);
    for c in [' ', '/', '|', '\n', '\r', '\t', '\x0B', '\x0C'] {
        assert!(!escaped.contains(c), "raw {c:?} in {escaped:?}");
    }
    // Every backslash introduces a two-character escape sequence
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            assert!(chars.next().is_some());
        }
    }
}

// =============================================================================
// Unescape Tests
// =============================================================================

#[test]
fn test_unescape_each_sequence() {
    assert_eq!(unescape("\\\\"), "\\");
    assert_eq!(unescape("\\/"), "/");
    assert_eq!(unescape("\\p"), "|");
    assert_eq!(unescape("\\n"), "\n");
    assert_eq!(unescape("\\r"), "\r");
    assert_eq!(unescape("\\t"), "\t");
    assert_eq!(unescape("\\v"), "\x0B");
    assert_eq!(unescape("\\f"), "\x0C");
    assert_eq!(unescape("\\s"), " ");
}

#[test]
fn test_unescape_is_total() {
    // Unknown escape sequences and a trailing backslash pass through
    assert_eq!(unescape("\\x"), "\\x");
    assert_eq!(unescape("abc\\"), "abc\\");
    assert_eq!(unescape("plain"), "plain");
}

#[test]
fn test_unescape_backslash_resolved_last() {
    // "\\s" on the wire is a literal backslash followed by "s", not a space
    assert_eq!(unescape("\\\\s"), "\\s");
    assert_eq!(unescape("\\\\n"), "\\n");
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_round_trip_specials_and_text() {
    let cases = [
        "",
        "plain",
        "hello world",
        "\\ / | \n \r \t \x0B \x0C",
        "already\\sescaped",
        "path/to/thing|other\\thing",
        "Tim's \"server\" #1",
        "\\\\\\",
        "unicode: größe 🦀",
    ];
    for case in cases {
        assert_eq!(unescape(&escape(case)), case, "round-trip of {case:?}");
    }
}
