// file: src/config/credentials.rs
// version: 1.0.0
// guid: 906d9b01-fce0-4028-b221-491f6d6712c5

//! AWS credential pairs carried by the cluster config file's pass-through keys

use std::fmt;

/// An AWS access key pair. The secret never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Both halves of the pair are present
    pub fn is_complete(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Credentials used to create the cluster and those handed to the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterCredentials {
    pub aws: AwsCredentials,
    pub operator: AwsCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = AwsCredentials::new("AKIAEXAMPLE", "super-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_is_complete() {
        assert!(AwsCredentials::new("a", "b").is_complete());
        assert!(!AwsCredentials::new("a", "").is_complete());
        assert!(!AwsCredentials::default().is_complete());
    }
}
