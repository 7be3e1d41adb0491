// file: src/lib.rs
// version: 1.0.0
// guid: d01f49b2-152f-4684-8d12-4b7c0a020dd5

//! # Cortex Cluster Config
//!
//! Validation, defaulting and interactive resolution of the configuration that
//! bootstraps a Cortex cluster.
//!
//! A raw cluster document goes through the struct validator (defaults and
//! per-field rules), the interactive prompt resolver (capacity and instance
//! type), and the bucket name deriver before an [`config::InternalClusterConfig`]
//! can be created from it.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use error::{ClusterConfigError, FieldError, FieldErrorKind, FieldErrors, Result};

/// Version information for the utility. Also the tag stamped on every
/// default image reference.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
