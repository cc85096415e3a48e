//! Record parser
//!
//! Turns one raw reply line into zero, one, or many [`Record`]s.

use super::codec::unescape;
use super::record::{Record, Reply, Value};

/// Parse a reply line into records
///
/// The line splits on `|` into record-substrings and each record-substring
/// on spaces into tokens. A token with `=` maps its unescaped key to its
/// unescaped, numerically coerced value; a token without `=` is a flag and
/// maps, as-is, to an empty string. Empty tokens are skipped, and a
/// record-substring with no tokens contributes no record, which is what
/// makes the empty line parse to `None`.
///
/// Parsing is total: there is no malformed input, only empty-ish shapes.
pub fn parse_reply(line: &str) -> Option<Reply> {
    let mut records: Vec<Record> = Vec::new();

    for part in line.split('|') {
        let mut record = Record::new();
        for token in part.split(' ') {
            if token.is_empty() {
                continue;
            }
            match token.split_once('=') {
                Some((key, value)) => {
                    record.insert(unescape(key), Value::coerce(unescape(value)));
                }
                None => {
                    record.insert(token.to_string(), Value::Str(String::new()));
                }
            }
        }
        if !record.is_empty() {
            records.push(record);
        }
    }

    match records.len() {
        0 => None,
        1 => records.pop().map(Reply::One),
        _ => Some(Reply::Many(records)),
    }
}
