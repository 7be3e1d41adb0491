// file: src/utils/table.rs
// version: 1.0.0
// guid: 73223a5e-d3fe-4a32-bf1f-2a545a86d6ce

//! Two-column key/value layout

use std::fmt::Display;

/// One label/value row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Render rows as `key<delimiter><spaces>value`, one per line, with every
/// value starting in the same column. The longest key gets exactly `padding`
/// spaces after the delimiter.
pub fn align_key_value(items: &[KeyValue], delimiter: &str, padding: usize) -> String {
    let width = items
        .iter()
        .map(|item| item.key.chars().count())
        .max()
        .unwrap_or(0);

    items
        .iter()
        .map(|item| {
            let gap = padding + width - item.key.chars().count();
            format!("{}{}{}{}", item.key, delimiter, " ".repeat(gap), item.value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
