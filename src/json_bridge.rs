//! Record <-> strict JSON conversion
//!
//! The flat wire form is not valid JSON. This bridge renders the same
//! record as an ordinary JSON object (escaped strings, no trailing commas,
//! `null` for the null marker) and reads such objects back into raw pairs.

use crate::error::*;
use crate::types::*;
use serde_json::{Map, Value as JsonValue};

/// Convert a record to a JSON object, keeping member order
pub fn to_json(record: &Record) -> JsonValue {
    let mut map = Map::new();
    for entry in record.entries() {
        let value = match &entry.text {
            Some(text) => JsonValue::String(text.clone()),
            None => JsonValue::Null,
        };
        map.insert(entry.key.clone(), value);
    }
    JsonValue::Object(map)
}

/// Stringify a record as strict JSON
pub fn to_json_string(record: &Record) -> Result<String> {
    Ok(serde_json::to_string(&to_json(record))?)
}

/// Read a JSON object into raw pairs. Strings are wrapped in one pair of
/// quotes, the same delimiters the wire scanner keeps, so inference strips
/// exactly that layer and a quoted string survives. Numbers and booleans
/// use their bare JSON text, nulls are dropped.
pub fn pairs_from_json(json: &JsonValue) -> Result<Vec<RawPair>> {
    let JsonValue::Object(map) = json else {
        return Err(FlatError::MalformedWireText("top-level JSON value must be an object".into()));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let text = match value {
            JsonValue::Null => continue,
            JsonValue::String(s) => format!("\"{}\"", s),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Array(_) | JsonValue::Object(_) => {
                return Err(FlatError::shape(key.as_str(), "nested JSON values are not supported"));
            }
        };
        pairs.push(RawPair::new(key.clone(), text));
    }
    Ok(pairs)
}

/// Parse a JSON string into raw pairs
pub fn pairs_from_json_str(json_str: &str) -> Result<Vec<RawPair>> {
    let json: JsonValue = serde_json::from_str(json_str)?;
    pairs_from_json(&json)
}
