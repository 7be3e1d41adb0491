// file: src/config/mod.rs
// version: 2.0.0
// guid: a1b2c3d4-e5f6-7a8b-9c0d-1e2f3a4b5c6d

//! Configuration module for Cortex clusters
//!
//! Handles loading, validation, interactive resolution and presentation of
//! cluster configurations.

pub mod bucket;
pub mod cluster;
pub mod credentials;
pub mod loader;
pub mod presenter;
pub mod prompt;
pub mod resolver;
pub mod rules;
pub mod validator;

pub use bucket::{derive_bucket_name, AccountIdentity, AccountLookup, StaticAccountLookup};
pub use cluster::{validate_instance_type, ClusterConfig, InternalClusterConfig, ResolvedClusterConfig};
pub use credentials::{AwsCredentials, ClusterCredentials};
pub use loader::ConfigLoader;
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use resolver::{resolve_cluster_config, ResolveOptions};
pub use validator::{Document, StructValidation};
