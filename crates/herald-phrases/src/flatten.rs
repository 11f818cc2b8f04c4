//! Nested phrase sources flattened into dotted-key tables.

use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use std::collections::HashMap;

/// A leaf of a phrase table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phrase {
    /// A single format string. May carry an include marker.
    Text(String),
    /// Format strings joined with `\n` at resolve time.
    Lines(Vec<String>),
}

impl Phrase {
    /// The phrase as one string, lines joined with `\n`.
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Lines(lines) => Cow::Owned(lines.join("\n")),
        }
    }
}

/// Dotted key → leaf.
pub type PhraseTable = HashMap<String, Phrase>;

/// Flatten a nested mapping into a single-level table keyed by `.`-joined paths.
///
/// Only mappings are recursed into. Sequences are kept as [`Phrase::Lines`],
/// scalars become [`Phrase::Text`], nulls are skipped.
pub fn flatten(source: &Mapping) -> PhraseTable {
    let mut table = PhraseTable::new();
    flatten_into(source, "", &mut table);
    table
}

fn flatten_into(map: &Mapping, prefix: &str, table: &mut PhraseTable) {
    for (key, value) in map {
        let Some(segment) = scalar_text(key) else {
            continue;
        };
        let path = if prefix.is_empty() {
            segment
        } else {
            format!("{prefix}.{segment}")
        };
        match value {
            Value::Mapping(nested) => flatten_into(nested, &path, table),
            Value::Sequence(items) => {
                table.insert(path, Phrase::Lines(items.iter().map(item_text).collect()));
            }
            Value::Null => {}
            other => {
                table.insert(path, Phrase::Text(item_text(other)));
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn item_text(value: &Value) -> String {
    match scalar_text(value) {
        Some(text) => text,
        None if value.is_null() => String::new(),
        None => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
