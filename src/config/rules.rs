// file: src/config/rules.rs
// version: 1.0.0
// guid: 30fd1340-1d14-4b8e-9b4b-96f39e344336

//! Declarative per-field rules
//!
//! A [`FieldRule`] names a document key, the kind of value it holds and the
//! accessor for the matching field on the target struct. Rule tables are plain
//! data; nothing here inspects the target type at runtime.

use crate::error::{FieldError, FieldErrorKind};
use serde_json::Value;

/// Custom check run on a parsed string. Returns the value to store.
pub type StringValidator = fn(&str) -> Result<String, FieldErrorKind>;

/// Constraints for string fields
#[derive(Clone, Default)]
pub struct StringRule {
    pub required: bool,
    pub default: Option<String>,
    pub allow_empty: bool,
    pub validator: Option<StringValidator>,
}

impl StringRule {
    pub fn with_default(default: impl Into<String>) -> Self {
        Self {
            default: Some(default.into()),
            ..Self::default()
        }
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validator(mut self, validator: StringValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Check a supplied value against the empty-string rule and the custom validator
    pub fn check(&self, value: &str) -> Result<String, FieldErrorKind> {
        if value.is_empty() && !self.allow_empty {
            return Err(FieldErrorKind::EmptyString);
        }
        match self.validator {
            Some(validator) => validator(value),
            None => Ok(value.to_string()),
        }
    }
}

/// Constraints for 64-bit integer fields
#[derive(Debug, Clone, Default)]
pub struct IntRule {
    pub required: bool,
    pub default: Option<i64>,
    pub greater_than: Option<i64>,
    pub greater_than_or_equal_to: Option<i64>,
    pub less_than: Option<i64>,
    pub less_than_or_equal_to: Option<i64>,
}

impl IntRule {
    pub fn with_default(default: i64) -> Self {
        Self {
            default: Some(default),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn greater_than(mut self, bound: i64) -> Self {
        self.greater_than = Some(bound);
        self
    }

    pub fn greater_than_or_equal_to(mut self, bound: i64) -> Self {
        self.greater_than_or_equal_to = Some(bound);
        self
    }

    pub fn less_than(mut self, bound: i64) -> Self {
        self.less_than = Some(bound);
        self
    }

    pub fn less_than_or_equal_to(mut self, bound: i64) -> Self {
        self.less_than_or_equal_to = Some(bound);
        self
    }

    /// Check a supplied value against every declared bound. Never clamps.
    pub fn check(&self, value: i64) -> Result<i64, FieldErrorKind> {
        if let Some(bound) = self.greater_than {
            if value <= bound {
                return Err(FieldErrorKind::GreaterThan(bound));
            }
        }
        if let Some(bound) = self.greater_than_or_equal_to {
            if value < bound {
                return Err(FieldErrorKind::GreaterThanOrEqualTo(bound));
            }
        }
        if let Some(bound) = self.less_than {
            if value >= bound {
                return Err(FieldErrorKind::LessThan(bound));
            }
        }
        if let Some(bound) = self.less_than_or_equal_to {
            if value > bound {
                return Err(FieldErrorKind::LessThanOrEqualTo(bound));
            }
        }
        Ok(value)
    }
}

/// Constraints for boolean fields
#[derive(Debug, Clone, Default)]
pub struct BoolRule {
    pub required: bool,
    pub default: Option<bool>,
}

impl BoolRule {
    pub fn with_default(default: bool) -> Self {
        Self {
            default: Some(default),
            ..Self::default()
        }
    }
}

/// Value kind of a rule together with the accessor for its target field
pub enum RuleKind<T> {
    OptionalString {
        slot: fn(&mut T) -> &mut Option<String>,
        rule: StringRule,
    },
    OptionalInt {
        slot: fn(&mut T) -> &mut Option<i64>,
        rule: IntRule,
    },
    String {
        slot: fn(&mut T) -> &mut String,
        rule: StringRule,
    },
    Int {
        slot: fn(&mut T) -> &mut i64,
        rule: IntRule,
    },
    Bool {
        slot: fn(&mut T) -> &mut bool,
        rule: BoolRule,
    },
    /// Key accepted in the document but mapped to no field
    PassThrough,
}

/// One entry of a rule table
pub struct FieldRule<T> {
    pub key: &'static str,
    pub kind: RuleKind<T>,
}

impl<T> FieldRule<T> {
    pub fn optional_string(
        key: &'static str,
        slot: fn(&mut T) -> &mut Option<String>,
        rule: StringRule,
    ) -> Self {
        Self {
            key,
            kind: RuleKind::OptionalString { slot, rule },
        }
    }

    pub fn optional_int(
        key: &'static str,
        slot: fn(&mut T) -> &mut Option<i64>,
        rule: IntRule,
    ) -> Self {
        Self {
            key,
            kind: RuleKind::OptionalInt { slot, rule },
        }
    }

    pub fn string(key: &'static str, slot: fn(&mut T) -> &mut String, rule: StringRule) -> Self {
        Self {
            key,
            kind: RuleKind::String { slot, rule },
        }
    }

    pub fn int(key: &'static str, slot: fn(&mut T) -> &mut i64, rule: IntRule) -> Self {
        Self {
            key,
            kind: RuleKind::Int { slot, rule },
        }
    }

    pub fn bool(key: &'static str, slot: fn(&mut T) -> &mut bool, rule: BoolRule) -> Self {
        Self {
            key,
            kind: RuleKind::Bool { slot, rule },
        }
    }

    pub fn pass_through(key: &'static str) -> Self {
        Self {
            key,
            kind: RuleKind::PassThrough,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self.kind, RuleKind::PassThrough)
    }

    /// Resolve this rule's field on `target` from the document value, if any.
    ///
    /// `None` and an explicit `null` both mean the key was not supplied: the
    /// default is substituted, a required field errors, and an optional field
    /// is left as it is.
    pub fn apply(&self, target: &mut T, value: Option<&Value>) -> Result<(), FieldError> {
        self.resolve(target, value.filter(|v| !v.is_null()))
            .map_err(|kind| FieldError::new(self.key, kind))
    }

    fn resolve(&self, target: &mut T, value: Option<&Value>) -> Result<(), FieldErrorKind> {
        match &self.kind {
            RuleKind::OptionalString { slot, rule } => match value {
                Some(value) => *slot(target) = Some(rule.check(as_str(value)?)?),
                None => {
                    if let Some(default) = fallback(&rule.default, rule.required)? {
                        *slot(target) = Some(default.clone());
                    }
                }
            },
            RuleKind::OptionalInt { slot, rule } => match value {
                Some(value) => *slot(target) = Some(rule.check(as_int(value)?)?),
                None => {
                    if let Some(default) = fallback(&rule.default, rule.required)? {
                        *slot(target) = Some(*default);
                    }
                }
            },
            RuleKind::String { slot, rule } => match value {
                Some(value) => *slot(target) = rule.check(as_str(value)?)?,
                None => {
                    if let Some(default) = fallback(&rule.default, rule.required)? {
                        *slot(target) = default.clone();
                    }
                }
            },
            RuleKind::Int { slot, rule } => match value {
                Some(value) => *slot(target) = rule.check(as_int(value)?)?,
                None => {
                    if let Some(default) = fallback(&rule.default, rule.required)? {
                        *slot(target) = *default;
                    }
                }
            },
            RuleKind::Bool { slot, rule } => match value {
                Some(value) => {
                    *slot(target) = value
                        .as_bool()
                        .ok_or(FieldErrorKind::InvalidType("a boolean"))?
                }
                None => {
                    if let Some(default) = fallback(&rule.default, rule.required)? {
                        *slot(target) = *default;
                    }
                }
            },
            RuleKind::PassThrough => {}
        }
        Ok(())
    }

    /// Parse an operator's typed answer into the value kind this rule expects
    pub fn parse_text(&self, text: &str) -> Result<Value, FieldError> {
        let parsed = match &self.kind {
            RuleKind::OptionalString { .. } | RuleKind::String { .. } => {
                Ok(Value::String(text.to_string()))
            }
            RuleKind::OptionalInt { .. } | RuleKind::Int { .. } => text
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FieldErrorKind::InvalidType("an integer")),
            RuleKind::Bool { .. } => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" => Ok(Value::Bool(true)),
                "false" | "no" | "n" => Ok(Value::Bool(false)),
                _ => Err(FieldErrorKind::InvalidType("a boolean")),
            },
            RuleKind::PassThrough => Ok(Value::Null),
        };
        parsed.map_err(|kind| FieldError::new(self.key, kind))
    }

    /// Default rendered the way an operator would type it
    pub fn default_text(&self) -> Option<String> {
        match &self.kind {
            RuleKind::OptionalString { rule, .. } | RuleKind::String { rule, .. } => {
                rule.default.clone()
            }
            RuleKind::OptionalInt { rule, .. } | RuleKind::Int { rule, .. } => {
                rule.default.map(|d| d.to_string())
            }
            RuleKind::Bool { rule, .. } => rule.default.map(|d| d.to_string()),
            RuleKind::PassThrough => None,
        }
    }

    /// Whether an optional field already holds a value. Non-optional fields
    /// carry no unset state and always report `false`.
    pub fn is_populated(&self, target: &mut T) -> bool {
        match &self.kind {
            RuleKind::OptionalString { slot, .. } => slot(target).is_some(),
            RuleKind::OptionalInt { slot, .. } => slot(target).is_some(),
            _ => false,
        }
    }
}

fn fallback<D>(default: &Option<D>, required: bool) -> Result<Option<&D>, FieldErrorKind> {
    match default {
        Some(default) => Ok(Some(default)),
        None if required => Err(FieldErrorKind::MissingRequired),
        None => Ok(None),
    }
}

fn as_str(value: &Value) -> Result<&str, FieldErrorKind> {
    value.as_str().ok_or(FieldErrorKind::InvalidType("a string"))
}

fn as_int(value: &Value) -> Result<i64, FieldErrorKind> {
    value.as_i64().ok_or(FieldErrorKind::InvalidType("an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Sample {
        name: String,
        size: i64,
        enabled: bool,
        kind: Option<String>,
        count: Option<i64>,
    }

    type Rule = FieldRule<Sample>;

    fn reject_test(value: &str) -> Result<String, FieldErrorKind> {
        if value.ends_with("test") {
            Err(FieldErrorKind::InstanceTypeTooSmall)
        } else {
            Ok(value.to_string())
        }
    }

    #[test]
    fn test_int_rule_bounds() {
        let rule = IntRule::with_default(50)
            .greater_than_or_equal_to(20)
            .less_than_or_equal_to(16384);
        assert_eq!(rule.check(20), Ok(20));
        assert_eq!(rule.check(16384), Ok(16384));
        assert_eq!(rule.check(19), Err(FieldErrorKind::GreaterThanOrEqualTo(20)));
        assert_eq!(rule.check(16385), Err(FieldErrorKind::LessThanOrEqualTo(16384)));

        let strict = IntRule::default().greater_than(0).less_than(10);
        assert_eq!(strict.check(0), Err(FieldErrorKind::GreaterThan(0)));
        assert_eq!(strict.check(10), Err(FieldErrorKind::LessThan(10)));
        assert_eq!(strict.check(9), Ok(9));
    }

    #[test]
    fn test_string_rule_empty_and_validator() {
        let rule = StringRule::default();
        assert_eq!(rule.check(""), Err(FieldErrorKind::EmptyString));
        assert!(StringRule::default().allow_empty().check("").is_ok());

        let custom = StringRule::default().validator(reject_test);
        assert_eq!(custom.check("prod"), Ok("prod".to_string()));
        assert_eq!(custom.check("unittest"), Err(FieldErrorKind::InstanceTypeTooSmall));
    }

    #[test]
    fn test_apply_supplied_and_default_values() {
        let mut sample = Sample::default();
        let name = Rule::string("name", |s| &mut s.name, StringRule::with_default("cortex"));
        let size = Rule::int("size", |s| &mut s.size, IntRule::with_default(50));
        let enabled = Rule::bool("enabled", |s| &mut s.enabled, BoolRule::with_default(true));

        name.apply(&mut sample, Some(&json!("custom"))).unwrap();
        size.apply(&mut sample, None).unwrap();
        enabled.apply(&mut sample, Some(&Value::Null)).unwrap();

        assert_eq!(sample.name, "custom");
        assert_eq!(sample.size, 50);
        assert!(sample.enabled);
    }

    #[test]
    fn test_apply_optional_left_unset() {
        let mut sample = Sample::default();
        let kind = Rule::optional_string("kind", |s| &mut s.kind, StringRule::default());
        let count = Rule::optional_int("count", |s| &mut s.count, IntRule::default().greater_than(0));

        kind.apply(&mut sample, None).unwrap();
        count.apply(&mut sample, None).unwrap();
        assert!(sample.kind.is_none());
        assert!(sample.count.is_none());

        count.apply(&mut sample, Some(&json!(3))).unwrap();
        assert_eq!(sample.count, Some(3));
        assert!(count.is_populated(&mut sample));
        assert!(!kind.is_populated(&mut sample));
    }

    #[test]
    fn test_apply_errors_are_scoped_to_key() {
        let mut sample = Sample::default();
        let size = Rule::int("size", |s| &mut s.size, IntRule::default().required());
        let count = Rule::optional_int("count", |s| &mut s.count, IntRule::default().greater_than(0));

        let missing = size.apply(&mut sample, None).unwrap_err();
        assert_eq!(missing, FieldError::new("size", FieldErrorKind::MissingRequired));

        let wrong_type = size.apply(&mut sample, Some(&json!("big"))).unwrap_err();
        assert_eq!(wrong_type.kind, FieldErrorKind::InvalidType("an integer"));

        let out_of_range = count.apply(&mut sample, Some(&json!(0))).unwrap_err();
        assert_eq!(out_of_range.kind, FieldErrorKind::GreaterThan(0));
        assert!(sample.count.is_none());
    }

    #[test]
    fn test_parse_text() {
        let count = Rule::optional_int("count", |s| &mut s.count, IntRule::with_default(2));
        let enabled = Rule::bool("enabled", |s| &mut s.enabled, BoolRule::default());

        assert_eq!(count.parse_text(" 7 ").unwrap(), json!(7));
        assert_eq!(count.parse_text("seven").unwrap_err().key, "count");
        assert_eq!(enabled.parse_text("yes").unwrap(), json!(true));
        assert_eq!(count.default_text().as_deref(), Some("2"));
        assert!(Rule::pass_through("secret").default_text().is_none());
    }
}
