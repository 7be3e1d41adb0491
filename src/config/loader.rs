// file: src/config/loader.rs
// version: 2.1.0
// guid: d4e5f6g7-h8i9-0123-4567-890123defghi

//! Cluster config file loading and environment variable substitution

use super::cluster::ClusterConfig;
use super::credentials::{AwsCredentials, ClusterCredentials};
use super::validator::Document;
use crate::error::{ClusterConfigError, FieldError, FieldErrorKind};
use crate::Result;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader over the current process environment
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Create a loader that sees no environment variables
    pub fn isolated() -> Self {
        Self {
            env_vars: HashMap::new(),
        }
    }

    /// Load a cluster config file into a loose document.
    ///
    /// No path, or a blank file, is the empty document.
    pub fn load_document<P: AsRef<Path>>(&self, path: Option<P>) -> Result<Document> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Document::new()),
        };

        let content = fs::read_to_string(&path).map_err(|e| {
            ClusterConfigError::config(format!(
                "Failed to read cluster config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        debug!("Loaded cluster config file {}", path.as_ref().display());

        self.parse_document(&content)
    }

    /// Parse YAML (or JSON) text into a loose document.
    ///
    /// `${VAR}` placeholders are substituted inside string values after
    /// parsing, so comments are never expanded and a substituted value can
    /// not change the structure of the file. Substituted values stay
    /// strings; an integer field cannot be filled from the environment.
    pub fn parse_document(&self, content: &str) -> Result<Document> {
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        let mut document = match serde_yaml::from_str::<Value>(content)? {
            Value::Object(document) => document,
            Value::Null => return Ok(Document::new()),
            _ => {
                return Err(ClusterConfigError::config(
                    "Cluster config must be a mapping of keys to values",
                ))
            }
        };

        let pattern = placeholder_pattern()?;
        let mut missing_vars = Vec::new();
        for value in document.values_mut() {
            self.expand_value(&pattern, value, &mut missing_vars);
        }
        missing_vars_result(missing_vars)?;

        Ok(document)
    }

    /// Load and validate a cluster config file, reporting every field error
    pub fn load_cluster_config<P: AsRef<Path>>(
        &self,
        path: Option<P>,
        version: &str,
    ) -> Result<ClusterConfig> {
        let document = self.load_document(path)?;
        Ok(ClusterConfig::from_document(&document, version)?)
    }

    /// Collect credentials from the pass-through keys, falling back to the environment.
    ///
    /// Operator credentials default to the cluster-creation pair.
    pub fn resolve_credentials(&self, document: &Document) -> Result<ClusterCredentials> {
        let aws = AwsCredentials::new(
            self.credential(document, "aws_access_key_id", "AWS_ACCESS_KEY_ID")?,
            self.credential(document, "aws_secret_access_key", "AWS_SECRET_ACCESS_KEY")?,
        );

        let operator = AwsCredentials::new(
            self.credential(document, "cortex_aws_access_key_id", "CORTEX_AWS_ACCESS_KEY_ID")?,
            self.credential(
                document,
                "cortex_aws_secret_access_key",
                "CORTEX_AWS_SECRET_ACCESS_KEY",
            )?,
        );
        let operator = if operator.is_complete() {
            operator
        } else {
            aws.clone()
        };

        Ok(ClusterCredentials { aws, operator })
    }

    fn credential(&self, document: &Document, key: &str, env_var: &str) -> Result<String> {
        match document.get(key) {
            Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                Ok(self.env_vars.get(env_var).cloned().unwrap_or_default())
            }
            Some(_) => Err(FieldError::new(key, FieldErrorKind::InvalidType("a string")).into()),
        }
    }

    /// Expand environment variables in a single piece of text
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let pattern = placeholder_pattern()?;
        let mut missing_vars = Vec::new();
        let expanded = self.expand_text(&pattern, content, &mut missing_vars);
        missing_vars_result(missing_vars)?;
        Ok(expanded)
    }

    fn expand_value(&self, pattern: &Regex, value: &mut Value, missing_vars: &mut Vec<String>) {
        match value {
            Value::String(text) => *text = self.expand_text(pattern, text, missing_vars),
            Value::Array(items) => {
                for item in items {
                    self.expand_value(pattern, item, missing_vars);
                }
            }
            Value::Object(map) => {
                for item in map.values_mut() {
                    self.expand_value(pattern, item, missing_vars);
                }
            }
            _ => {}
        }
    }

    fn expand_text(&self, pattern: &Regex, text: &str, missing_vars: &mut Vec<String>) -> String {
        pattern
            .replace_all(text, |cap: &regex::Captures| {
                let var_name = &cap[1];
                match self.env_vars.get(var_name) {
                    Some(value) => value.clone(),
                    None => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        cap[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

fn placeholder_pattern() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ClusterConfigError::config(format!("Invalid regex pattern: {}", e)))
}

fn missing_vars_result(missing_vars: Vec<String>) -> Result<()> {
    if missing_vars.is_empty() {
        Ok(())
    } else {
        Err(ClusterConfigError::config(format!(
            "Missing environment variables: {}",
            missing_vars.join(", ")
        )))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
