// file: src/config/validator.rs
// version: 1.0.0
// guid: 27713c78-9b43-4261-a5be-32a35bcd83a7

//! Struct validator: applies a rule table to a loosely-typed document

use super::rules::FieldRule;
use crate::error::FieldErrors;
use serde_json::Value;
use tracing::debug;

/// Loosely-typed key/value document as read from a cluster config file
pub type Document = serde_json::Map<String, Value>;

/// Ordered rule table for a target struct
pub struct StructValidation<T> {
    rules: Vec<FieldRule<T>>,
}

impl<T> StructValidation<T> {
    pub fn new(rules: Vec<FieldRule<T>>) -> Self {
        Self { rules }
    }

    /// Whether `key` is declared by a field rule or a pass-through rule
    pub fn is_recognized(&self, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.key == key)
    }

    /// Apply every rule, in order, to `target`.
    ///
    /// Errors accumulate; a failing field never stops the remaining rules
    /// from running. Pass-through and unrecognised keys are not copied.
    pub fn apply(&self, target: &mut T, document: &Document) -> FieldErrors {
        let mut errors = FieldErrors::new();

        for rule in &self.rules {
            if rule.is_pass_through() {
                continue;
            }
            if let Err(error) = rule.apply(target, document.get(rule.key)) {
                debug!("Rejected field {}", error);
                errors.push(error);
            }
        }

        for key in document.keys() {
            if !self.is_recognized(key) {
                debug!("Ignoring unrecognized key: {}", key);
            }
        }

        errors
    }

    /// Build a fresh `T` from `document`, or return every field error found
    pub fn validate(&self, document: &Document) -> Result<T, FieldErrors>
    where
        T: Default,
    {
        let mut target = T::default();
        let errors = self.apply(&mut target, document);
        if errors.is_empty() {
            Ok(target)
        } else {
            Err(errors)
        }
    }
}
