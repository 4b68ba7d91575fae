//! Flat wire format
//!
//! Write side:
//!
//! ```text
//! record := '{' pair* '}'
//! pair   := '"' key '":"' text '",'
//! ```
//!
//! Every pair, including the last, is followed by a comma and every value
//! is quoted, numeric or not. This is not interchange JSON; see
//! [`crate::to_json_string`] for that.
//!
//! Read side scans for `"?key"?:"?value"?` matches left to right. Keys are
//! runs of word characters (alphanumeric or `_`). Values are runs of the
//! [`WireGrammar`]'s value characters. Spaces, commas, braces and escaped
//! quotes never appear inside a value: `"a b"` or `"1,2,"` do not read back
//! as one token. An unmatched input yields no pairs rather than an error.

use crate::encode::encode_member;
use crate::error::*;
use crate::reflect::{introspect, Reflect};
use crate::types::*;
use tracing::{debug, trace, warn};

/// Character class for value tokens on the read side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireGrammar {
    /// Word characters only. `"5.5"` reads as `"5` and `"-3"` is dropped.
    Word,
    /// Word characters plus `.`, `-` and `+`, so decimal and signed
    /// scalars survive the round trip
    #[default]
    Numeric,
}

impl WireGrammar {
    fn is_value_char(&self, c: char) -> bool {
        match self {
            WireGrammar::Word => is_word_char(c),
            WireGrammar::Numeric => is_word_char(c) || matches!(c, '.' | '-' | '+'),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ============================================================
// Write side
// ============================================================

/// Introspect and encode `value` into a record
pub fn assemble_record<T: Reflect>(value: &T, sort_keys: bool) -> Result<Record> {
    let mut record = Record::new();
    for member in introspect(value) {
        if !member.readable() {
            debug!(member = member.name, "skipping write-only member");
            continue;
        }
        let text = encode_member(&member, Some(value))?;
        if record.insert(member.name, text) {
            warn!(member = member.name, "member name collision, later value kept");
        }
    }
    if sort_keys {
        record.sort_by_key();
    }
    debug!(members = record.len(), "assembled record");
    Ok(record)
}

/// Render a record in wire form
pub fn write_record(record: &Record) -> String {
    let mut buf = String::new();
    write_entries(&mut buf, record.entries());
    buf
}

fn write_entries(buf: &mut String, entries: &[RecordEntry]) {
    buf.push('{');
    for entry in entries {
        buf.push('"');
        buf.push_str(&entry.key);
        buf.push_str("\":\"");
        if let Some(text) = &entry.text {
            buf.push_str(text);
        }
        buf.push_str("\",");
    }
    buf.push('}');
}

// ============================================================
// Read side
// ============================================================

/// Scan wire text for pairs using the default grammar
pub fn parse_pairs(text: &str) -> Vec<RawPair> {
    parse_pairs_with(text, WireGrammar::default())
}

/// Scan wire text for pairs. Duplicate keys are kept in order.
pub fn parse_pairs_with(text: &str, grammar: WireGrammar) -> Vec<RawPair> {
    let chars: Vec<char> = text.chars().collect();
    let (pairs, attempts) = scan(&chars, grammar);
    trace!(chars = chars.len(), attempts, pairs = pairs.len(), "scanned wire text");
    pairs
}

/// Leftmost scan returning the pairs and the number of match attempts.
/// A failed attempt resumes at the end of the key's word run; no start
/// inside that run can match.
fn scan(chars: &[char], grammar: WireGrammar) -> (Vec<RawPair>, usize) {
    let mut pairs = Vec::new();
    let mut attempts = 0;
    let mut pos = 0;

    while pos < chars.len() {
        attempts += 1;
        match match_pair(chars, pos, grammar) {
            Ok((pair, end)) => {
                trace!(key = %pair.key, value = %pair.value, "scanned pair");
                pairs.push(pair);
                pos = end;
            }
            Err(resume) => pos = resume.max(pos + 1),
        }
    }
    (pairs, attempts)
}

/// Checked scan: the text must be brace-delimited, and a non-empty body
/// must yield at least one pair
pub fn parse_record(text: &str, grammar: WireGrammar) -> Result<Vec<RawPair>> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| FlatError::MalformedWireText("record must be wrapped in braces".into()))?;

    let pairs = parse_pairs_with(body, grammar);
    if pairs.is_empty() && !body.trim().is_empty() {
        return Err(FlatError::MalformedWireText(format!(
            "no key/value pairs found in {:?}",
            body
        )));
    }
    Ok(pairs)
}

/// A `"?word"?` match: `word_end` is the end of the word run, `end`
/// includes an optional closing quote
struct Token {
    word_end: usize,
    end: usize,
}

fn match_token(chars: &[char], pos: usize, is_char: impl Fn(char) -> bool) -> Option<Token> {
    let mut i = pos;
    if chars.get(i) == Some(&'"') {
        i += 1;
    }
    let start = i;
    while chars.get(i).is_some_and(|c| is_char(*c)) {
        i += 1;
    }
    if i == start {
        return None;
    }
    let word_end = i;
    if chars.get(i) == Some(&'"') {
        i += 1;
    }
    Some(Token { word_end, end: i })
}

/// On failure returns the position to resume scanning from
fn match_pair(chars: &[char], pos: usize, grammar: WireGrammar) -> std::result::Result<(RawPair, usize), usize> {
    let key = match_token(chars, pos, is_word_char).ok_or(pos + 1)?;
    if chars.get(key.end) != Some(&':') {
        return Err(key.word_end);
    }
    let value_start = key.end + 1;
    let value = match_token(chars, value_start, |c| grammar.is_value_char(c)).ok_or(key.word_end)?;

    let key_text: String = chars[pos..key.end].iter().filter(|c| **c != '"').collect();
    let value_text: String = chars[value_start..value.end].iter().collect();
    Ok((RawPair::new(key_text, value_text), value.end))
}
