//! Output format configuration for log lines
//!
//! Provides the two encodings a writer backend can produce:
//! - Text: logfmt-style `key=value` pairs (default)
//! - Json: one JSON object per line, groups as nested objects

use super::attr::{Attr, FieldValue};
use super::level::Level;
use super::record::LEVEL_KEY;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A field ready for encoding, with the group path it was attached under
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedAttr {
    pub groups: Arc<[String]>,
    pub attr: Attr,
}

impl ScopedAttr {
    pub fn new(groups: Arc<[String]>, attr: Attr) -> Self {
        Self { groups, attr }
    }

    /// A field outside any group
    pub fn top_level(attr: Attr) -> Self {
        Self {
            groups: Arc::from(Vec::new()),
            attr,
        }
    }
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Key-value text
    ///
    /// Example: `time=2025-01-08T10:30:45.123456789Z level=INFO msg="Request processed" status=200`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"time":"2025-01-08T10:30:45.123456789Z","level":"INFO","msg":"Request processed"}`
    Json,
}

impl OutputFormat {
    /// Encode the fields of one record as a single line, without the trailing newline
    pub fn encode(&self, fields: &[ScopedAttr], colors: bool) -> String {
        match self {
            OutputFormat::Text => format_text(fields, colors),
            OutputFormat::Json => format_json(fields),
        }
    }
}

fn format_text(fields: &[ScopedAttr], colors: bool) -> String {
    let mut line = String::with_capacity(128);

    for field in fields {
        if !line.is_empty() {
            line.push(' ');
        }

        let mut key = String::new();
        for group in field.groups.iter() {
            key.push_str(group);
            key.push('.');
        }
        key.push_str(&field.attr.key);
        line.push_str(&escape_text(&key));
        line.push('=');

        let value = text_value(&field.attr.value);
        if colors && field.groups.is_empty() && field.attr.key == LEVEL_KEY {
            match level_of(&field.attr.value) {
                Some(level) => line.push_str(&value.color(level.color_code()).to_string()),
                None => line.push_str(&value),
            }
        } else {
            line.push_str(&value);
        }
    }

    line
}

fn text_value(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => escape_text(s),
        other => escape_text(&other.to_string()),
    }
}

/// The level a level field denotes, whether or not it was rewritten to a name
fn level_of(value: &FieldValue) -> Option<Level> {
    match value {
        FieldValue::Level(level) => Some(*level),
        FieldValue::String(name) => Level::lookup(name),
        _ => None,
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control())
}

/// Quote a text value when it would otherwise break `key=value` parsing
fn escape_text(s: &str) -> String {
    if !needs_quoting(s) {
        return s.to_string();
    }

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn format_json(fields: &[ScopedAttr]) -> String {
    let mut root = Map::new();
    for field in fields {
        insert_nested(
            &mut root,
            &field.groups,
            field.attr.key.clone(),
            field.attr.value.to_json_value(),
        );
    }
    Value::Object(root).to_string()
}

/// Place `value` under the group path, keeping whatever an earlier field wrote
///
/// A key that is already taken at its level is written as `key#2`, `key#3`,
/// and so on, so a caller field named `msg` never hides the built-in one.
fn insert_nested(map: &mut Map<String, Value>, groups: &[String], key: String, value: Value) {
    match groups.split_first() {
        None => {
            let key = free_key(map, key, |slot| slot.is_none());
            map.insert(key, value);
        }
        Some((group, rest)) => {
            let group = free_key(map, group.clone(), |slot| {
                matches!(slot, None | Some(Value::Object(_)))
            });
            let slot = map
                .entry(group)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = slot {
                insert_nested(inner, rest, key, value);
            }
        }
    }
}

/// First of `key`, `key#2`, `key#3`, ... whose current slot is `usable`
fn free_key<F>(map: &Map<String, Value>, key: String, usable: F) -> String
where
    F: Fn(Option<&Value>) -> bool,
{
    if usable(map.get(&key)) {
        return key;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}#{}", key, n);
        if usable(map.get(&candidate)) {
            return candidate;
        }
        n += 1;
    }
}
