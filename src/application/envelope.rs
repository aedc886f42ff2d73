//! Response-shape resolution for ang payloads.
//!
//! The verse provider does not guarantee a single payload shape. Known shapes
//! are tried through an ordered list of matchers and the first one yielding a
//! non-empty line sequence wins. Matching only borrows from the payload.

use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::lines::LineRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKey {
    Lines,
    Page,
    Verses,
    Data,
}

impl EnvelopeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            EnvelopeKey::Lines => "lines",
            EnvelopeKey::Page => "page",
            EnvelopeKey::Verses => "verses",
            EnvelopeKey::Data => "data",
        }
    }
}

/// The recognised payload shapes, each borrowing its line sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseEnvelope<'a> {
    /// The payload itself is the sequence.
    Sequence(&'a [Value]),
    /// The sequence sits under one of the top-level keys.
    Keyed { key: EnvelopeKey, lines: &'a [Value] },
    /// The sequence sits under `source.page`.
    NestedSource(&'a [Value]),
}

type ShapeMatcher = for<'a> fn(&'a Value) -> Option<ResponseEnvelope<'a>>;

const SHAPE_MATCHERS: [ShapeMatcher; 6] = [
    match_sequence,
    match_lines,
    match_page,
    match_verses,
    match_data,
    match_nested_source,
];

impl<'a> ResponseEnvelope<'a> {
    /// Decode `payload`, returning `None` when no shape yields any lines.
    pub fn decode(payload: &'a Value) -> Option<Self> {
        SHAPE_MATCHERS.iter().find_map(|matcher| matcher(payload))
    }

    pub fn lines(&self) -> &'a [Value] {
        match *self {
            ResponseEnvelope::Sequence(lines)
            | ResponseEnvelope::Keyed { lines, .. }
            | ResponseEnvelope::NestedSource(lines) => lines,
        }
    }
}

fn non_empty_array(value: &Value) -> Option<&[Value]> {
    value
        .as_array()
        .filter(|items| !items.is_empty())
        .map(Vec::as_slice)
}

fn match_sequence(payload: &Value) -> Option<ResponseEnvelope<'_>> {
    non_empty_array(payload).map(ResponseEnvelope::Sequence)
}

fn match_key(payload: &Value, key: EnvelopeKey) -> Option<ResponseEnvelope<'_>> {
    payload
        .get(key.as_str())
        .and_then(non_empty_array)
        .map(|lines| ResponseEnvelope::Keyed { key, lines })
}

fn match_lines(payload: &Value) -> Option<ResponseEnvelope<'_>> {
    match_key(payload, EnvelopeKey::Lines)
}

fn match_page(payload: &Value) -> Option<ResponseEnvelope<'_>> {
    match_key(payload, EnvelopeKey::Page)
}

fn match_verses(payload: &Value) -> Option<ResponseEnvelope<'_>> {
    match_key(payload, EnvelopeKey::Verses)
}

fn match_data(payload: &Value) -> Option<ResponseEnvelope<'_>> {
    match_key(payload, EnvelopeKey::Data)
}

fn match_nested_source(payload: &Value) -> Option<ResponseEnvelope<'_>> {
    payload
        .get("source")
        .filter(|source| source.is_object())
        .and_then(|source| source.get("page"))
        .and_then(non_empty_array)
        .map(ResponseEnvelope::NestedSource)
}

/// Lines that survived text resolution plus the count of dropped ones.
#[derive(Debug, Clone, Default)]
pub struct NormalizedLines {
    pub records: Vec<LineRecord>,
    pub skipped: usize,
}

pub fn normalize_lines(lines: &[Value]) -> NormalizedLines {
    let mut normalized = NormalizedLines::default();
    for (position, line) in lines.iter().enumerate() {
        match resolve_line(line) {
            Some(record) => normalized.records.push(record),
            None => {
                normalized.skipped += 1;
                let id = line_id(line).unwrap_or_default();
                warn!(
                    target: "gurshabad::render",
                    position,
                    line_id = %id,
                    "no gurmukhi text found for line"
                );
            }
        }
    }
    normalized
}

/// Resolve one raw line into a record. Lines without primary text yield `None`.
pub fn resolve_line(line: &Value) -> Option<LineRecord> {
    let object = line.as_object()?;

    let (primary, secondary) = match object.get("verse").and_then(Value::as_object) {
        Some(verse) => (
            first_text(verse, &["unicode", "gurmukhi"]),
            first_secondary(verse),
        ),
        None => (
            first_text(object, &["unicode", "gurmukhi", "text"]),
            first_secondary(object),
        ),
    };

    LineRecord::new(line_id(line), primary?, secondary)
}

fn line_id(line: &Value) -> Option<String> {
    match line.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn first_secondary(object: &Map<String, Value>) -> Option<String> {
    ["transliteration", "pronunciation"]
        .iter()
        .filter_map(|key| object.get(*key))
        .filter_map(|value| match value {
            Value::String(text) => Some(text.as_str()),
            // BaniDB nests transliterations per script.
            Value::Object(scripts) => scripts.get("english").and_then(Value::as_str),
            _ => None,
        })
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
