// file: src/error.rs
// version: 1.0.0
// guid: e2c86960-5ecf-42f1-8974-5653c7110712

use std::fmt;
use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, ClusterConfigError>;

/// Reason a single configuration field was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("must be {0}")]
    InvalidType(&'static str),

    #[error("must be provided")]
    MissingRequired,

    #[error("cannot be empty")]
    EmptyString,

    #[error("must be greater than {0}")]
    GreaterThan(i64),

    #[error("must be greater than or equal to {0}")]
    GreaterThanOrEqualTo(i64),

    #[error("must be less than {0}")]
    LessThan(i64),

    #[error("must be less than or equal to {0}")]
    LessThanOrEqualTo(i64),

    #[error("instance types smaller than medium (nano, micro and small) are not supported")]
    InstanceTypeTooSmall,
}

/// A rule violation scoped to the document key it was found under
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{key}: {kind}")]
pub struct FieldError {
    pub key: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Create a new field error
    pub fn new(key: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

/// Every field error from one validation pass, in rule declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error callers report when only one message fits
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Error types for cluster configuration resolution
#[derive(Error, Debug)]
pub enum ClusterConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid field {0}")]
    Field(#[from] FieldError),

    #[error("Cluster configuration is invalid:\n{0}")]
    Validation(FieldErrors),

    #[error("Invalid AWS credentials: the account lookup rejected the supplied access key")]
    InvalidCredentials,

    #[error("Account lookup error: {0}")]
    AccountLookup(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ClusterConfigError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new account lookup error
    pub fn account_lookup(msg: impl Into<String>) -> Self {
        Self::AccountLookup(msg.into())
    }

    /// Create a new prompt error
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// The first field-scoped error carried by this error, if any
    pub fn first_field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Field(error) => Some(error),
            Self::Validation(errors) => errors.first(),
            _ => None,
        }
    }
}

impl From<FieldErrors> for ClusterConfigError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let error = FieldError::new("min_instances", FieldErrorKind::GreaterThan(0));
        assert_eq!(error.to_string(), "min_instances: must be greater than 0");
    }

    #[test]
    fn test_field_errors_keep_order() {
        let mut errors = FieldErrors::new();
        errors.push(FieldError::new("region", FieldErrorKind::EmptyString));
        errors.push(FieldError::new(
            "instance_volume_size",
            FieldErrorKind::LessThanOrEqualTo(16384),
        ));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first().map(|e| e.key.as_str()), Some("region"));
        assert_eq!(
            errors.to_string(),
            "region: cannot be empty\ninstance_volume_size: must be less than or equal to 16384"
        );
    }

    #[test]
    fn test_first_field_error() {
        let err = ClusterConfigError::from(FieldErrors::from(FieldError::new(
            "instance_type",
            FieldErrorKind::InstanceTypeTooSmall,
        )));
        assert_eq!(
            err.first_field_error().map(|e| &e.kind),
            Some(&FieldErrorKind::InstanceTypeTooSmall)
        );
        assert!(ClusterConfigError::InvalidCredentials
            .first_field_error()
            .is_none());
    }
}
