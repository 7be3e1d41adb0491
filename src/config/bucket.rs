// file: src/config/bucket.rs
// version: 1.0.0
// guid: f2ecba31-da10-4311-a07e-e8a0eb978c10

//! Deterministic storage bucket naming from the AWS account identity

use super::cluster::ClusterConfig;
use super::credentials::AwsCredentials;
use crate::error::ClusterConfigError;
use crate::utils::CryptoUtils;
use crate::Result;
use tracing::{debug, info};

pub const BUCKET_PREFIX: &str = "cortex-";
/// Hex characters of the account hash kept in the bucket name
pub const BUCKET_HASH_LENGTH: usize = 10;

/// Outcome of an account identity lookup that reached the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub account_id: String,
    pub valid_credentials: bool,
}

/// Resolves the AWS account that owns a set of credentials.
///
/// Transport failures are returned as `Err`; credentials the service refused
/// come back as `Ok` with `valid_credentials == false`.
pub trait AccountLookup {
    fn account_identity(&self, credentials: &AwsCredentials, region: &str) -> Result<AccountIdentity>;
}

/// Lookup answering with a fixed identity, or failing when none was configured
#[derive(Debug, Clone, Default)]
pub struct StaticAccountLookup {
    identity: Option<AccountIdentity>,
}

impl StaticAccountLookup {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            identity: Some(AccountIdentity {
                account_id: account_id.into(),
                valid_credentials: true,
            }),
        }
    }

    /// Lookup that reports every credential pair as rejected
    pub fn rejecting() -> Self {
        Self {
            identity: Some(AccountIdentity {
                account_id: String::new(),
                valid_credentials: false,
            }),
        }
    }

    /// Lookup with no identity source; every call fails
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl AccountLookup for StaticAccountLookup {
    fn account_identity(&self, _credentials: &AwsCredentials, region: &str) -> Result<AccountIdentity> {
        self.identity.clone().ok_or_else(|| {
            ClusterConfigError::account_lookup(format!(
                "no account identity source configured for region {}",
                region
            ))
        })
    }
}

/// `cortex-` followed by the first ten hex characters of the account id's SHA-256
pub fn derive_bucket_name(account_id: &str) -> String {
    let hash = CryptoUtils::hash_string(account_id);
    format!("{}{}", BUCKET_PREFIX, &hash[..BUCKET_HASH_LENGTH])
}

impl ClusterConfig {
    /// Fill `bucket` from the account identity unless it is already set
    pub fn set_bucket<L>(&mut self, lookup: &L, credentials: &AwsCredentials) -> Result<()>
    where
        L: AccountLookup + ?Sized,
    {
        if !self.bucket.is_empty() {
            debug!("Keeping configured bucket {}", self.bucket);
            return Ok(());
        }

        let identity = lookup.account_identity(credentials, &self.region)?;
        if !identity.valid_credentials {
            return Err(ClusterConfigError::InvalidCredentials);
        }

        self.bucket = derive_bucket_name(&identity.account_id);
        info!("Derived bucket name {}", self.bucket);
        Ok(())
    }
}
