// file: src/config/resolver.rs
// version: 1.0.0
// guid: a586e97b-da87-475d-8e3a-d039a1450e02

//! Full resolution pipeline: validate, prompt, derive bucket

use super::bucket::AccountLookup;
use super::cluster::{ClusterConfig, ResolvedClusterConfig};
use super::credentials::ClusterCredentials;
use super::prompt::Prompter;
use super::validator::Document;
use crate::error::ClusterConfigError;
use crate::logging::logger::with_operation_span;
use crate::Result;
use tracing::info;

/// How a document is resolved
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Tag stamped on default image references
    pub version: String,
    /// Leave already-set prompt fields alone instead of re-asking
    pub skip_populated_fields: bool,
    /// Include the instance type in the prompt sequence
    pub prompt_instance_type: bool,
    /// Defaults shown at the prompts. `None` offers the values the document
    /// already set, then the built-in fallbacks.
    pub prompt_defaults: Option<ClusterConfig>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            skip_populated_fields: false,
            prompt_instance_type: true,
            prompt_defaults: None,
        }
    }
}

/// Resolve a raw document into a config ready for admission.
///
/// Each stage runs to completion before the next; the struct validator
/// reports its whole error batch, the later stages stop at their first error.
pub fn resolve_cluster_config<P, L>(
    document: &Document,
    credentials: &ClusterCredentials,
    options: &ResolveOptions,
    prompter: &mut P,
    lookup: &L,
) -> Result<ResolvedClusterConfig>
where
    P: Prompter + ?Sized,
    L: AccountLookup + ?Sized,
{
    let mut config = with_operation_span("validate", || {
        ClusterConfig::from_document(document, &options.version)
    })?;

    with_operation_span("prompt", || {
        let prompts = ClusterConfig::prompt_validation(
            options.skip_populated_fields,
            options.prompt_instance_type,
            Some(options.prompt_defaults.as_ref().unwrap_or(&config)),
        );
        prompts.run(&mut config, prompter)
    })?;

    with_operation_span("bucket", || {
        if config.bucket.is_empty() && !credentials.aws.is_complete() {
            return Err(ClusterConfigError::config(
                "AWS credentials are required to derive the bucket name; set aws_access_key_id and aws_secret_access_key",
            ));
        }
        config.set_bucket(lookup, &credentials.aws)
    })?;

    info!(
        "Resolved cluster {} in {}",
        config.cluster_name, config.region
    );
    ResolvedClusterConfig::try_from(config)
}
