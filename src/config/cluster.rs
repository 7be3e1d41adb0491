// file: src/config/cluster.rs
// version: 1.0.0
// guid: 0af17c3b-ab3a-4bf7-899c-22bdbc03307b

//! Cluster configuration structures and their rule tables

use super::prompt::{PromptItem, PromptValidation};
use super::rules::{BoolRule, FieldRule, IntRule, StringRule};
use super::validator::{Document, StructValidation};
use crate::error::{ClusterConfigError, FieldError, FieldErrorKind, FieldErrors};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

pub const DEFAULT_CLUSTER_NAME: &str = "cortex";
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_LOG_GROUP: &str = "cortex";
pub const DEFAULT_INSTANCE_VOLUME_SIZE: i64 = 50;
// Room for the serving images plus runtime overhead
pub const MIN_INSTANCE_VOLUME_SIZE: i64 = 20;
pub const MAX_INSTANCE_VOLUME_SIZE: i64 = 16384;

pub const DEFAULT_INSTANCE_TYPE: &str = "m5.large";
pub const DEFAULT_MIN_INSTANCES: i64 = 2;
pub const DEFAULT_MAX_INSTANCES: i64 = 5;

/// Registry namespace of every default image
pub const IMAGE_REGISTRY: &str = "cortexlabs";

/// Document keys accepted for operator convenience but mapped to no field
pub const PASS_THROUGH_KEYS: [&str; 4] = [
    "aws_access_key_id",
    "aws_secret_access_key",
    "cortex_aws_access_key_id",
    "cortex_aws_secret_access_key",
];

const TOO_SMALL_SUFFIXES: [&str; 3] = ["nano", "micro", "small"];

/// User-facing cluster configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub instance_type: Option<String>,
    pub min_instances: Option<i64>,
    pub max_instances: Option<i64>,
    pub cluster_name: String,
    pub region: String,
    pub bucket: String,
    pub log_group: String,
    pub instance_volume_size: i64,
    pub telemetry: bool,
    pub image_predictor_serve: String,
    pub image_predictor_serve_gpu: String,
    pub image_tf_serve: String,
    pub image_tf_serve_gpu: String,
    pub image_tf_api: String,
    pub image_onnx_serve: String,
    pub image_onnx_serve_gpu: String,
    pub image_operator: String,
    pub image_manager: String,
    pub image_downloader: String,
    pub image_cluster_autoscaler: String,
    pub image_metrics_server: String,
    pub image_nvidia: String,
    pub image_fluentd: String,
    pub image_statsd: String,
    pub image_istio_proxy: String,
    pub image_istio_pilot: String,
    pub image_istio_citadel: String,
    pub image_istio_galley: String,
}

type Rule = FieldRule<ClusterConfig>;

fn image_rule(
    key: &'static str,
    repository: &str,
    version: &str,
    slot: fn(&mut ClusterConfig) -> &mut String,
) -> Rule {
    Rule::string(
        key,
        slot,
        StringRule::with_default(format!("{}/{}:{}", IMAGE_REGISTRY, repository, version)),
    )
}

/// Reject instance types too small to leave scheduling headroom
pub fn validate_instance_type(instance_type: &str) -> Result<String, FieldErrorKind> {
    if TOO_SMALL_SUFFIXES
        .iter()
        .any(|suffix| instance_type.ends_with(suffix))
    {
        return Err(FieldErrorKind::InstanceTypeTooSmall);
    }
    Ok(instance_type.to_string())
}

impl ClusterConfig {
    /// File rule table. `version` is the tag stamped on every default image.
    ///
    /// Capacity bounds and instance type get no default here; they are
    /// confirmed interactively.
    pub fn validation(version: &str) -> StructValidation<ClusterConfig> {
        let mut rules = vec![
            Rule::optional_string(
                "instance_type",
                |c| &mut c.instance_type,
                StringRule::default().validator(validate_instance_type),
            ),
            Rule::optional_int(
                "min_instances",
                |c| &mut c.min_instances,
                IntRule::default().greater_than(0),
            ),
            Rule::optional_int(
                "max_instances",
                |c| &mut c.max_instances,
                IntRule::default().greater_than(0),
            ),
            Rule::string(
                "cluster_name",
                |c| &mut c.cluster_name,
                StringRule::with_default(DEFAULT_CLUSTER_NAME),
            ),
            Rule::string(
                "region",
                |c| &mut c.region,
                StringRule::with_default(DEFAULT_REGION),
            ),
            Rule::string(
                "bucket",
                |c| &mut c.bucket,
                StringRule::with_default("").allow_empty(),
            ),
            Rule::string(
                "log_group",
                |c| &mut c.log_group,
                StringRule::with_default(DEFAULT_LOG_GROUP),
            ),
            Rule::int(
                "instance_volume_size",
                |c| &mut c.instance_volume_size,
                IntRule::with_default(DEFAULT_INSTANCE_VOLUME_SIZE)
                    .greater_than_or_equal_to(MIN_INSTANCE_VOLUME_SIZE)
                    .less_than_or_equal_to(MAX_INSTANCE_VOLUME_SIZE),
            ),
            Rule::bool("telemetry", |c| &mut c.telemetry, BoolRule::with_default(true)),
            image_rule("image_predictor_serve", "predictor-serve", version, |c| {
                &mut c.image_predictor_serve
            }),
            image_rule("image_predictor_serve_gpu", "predictor-serve-gpu", version, |c| {
                &mut c.image_predictor_serve_gpu
            }),
            image_rule("image_tf_serve", "tf-serve", version, |c| &mut c.image_tf_serve),
            image_rule("image_tf_serve_gpu", "tf-serve-gpu", version, |c| {
                &mut c.image_tf_serve_gpu
            }),
            image_rule("image_tf_api", "tf-api", version, |c| &mut c.image_tf_api),
            image_rule("image_onnx_serve", "onnx-serve", version, |c| &mut c.image_onnx_serve),
            image_rule("image_onnx_serve_gpu", "onnx-serve-gpu", version, |c| {
                &mut c.image_onnx_serve_gpu
            }),
            image_rule("image_operator", "operator", version, |c| &mut c.image_operator),
            image_rule("image_manager", "manager", version, |c| &mut c.image_manager),
            image_rule("image_downloader", "downloader", version, |c| &mut c.image_downloader),
            image_rule("image_cluster_autoscaler", "cluster-autoscaler", version, |c| {
                &mut c.image_cluster_autoscaler
            }),
            image_rule("image_metrics_server", "metrics-server", version, |c| {
                &mut c.image_metrics_server
            }),
            image_rule("image_nvidia", "nvidia", version, |c| &mut c.image_nvidia),
            image_rule("image_fluentd", "fluentd", version, |c| &mut c.image_fluentd),
            image_rule("image_statsd", "statsd", version, |c| &mut c.image_statsd),
            image_rule("image_istio_proxy", "istio-proxy", version, |c| &mut c.image_istio_proxy),
            image_rule("image_istio_pilot", "istio-pilot", version, |c| &mut c.image_istio_pilot),
            image_rule("image_istio_citadel", "istio-citadel", version, |c| {
                &mut c.image_istio_citadel
            }),
            image_rule("image_istio_galley", "istio-galley", version, |c| {
                &mut c.image_istio_galley
            }),
        ];
        rules.extend(PASS_THROUGH_KEYS.into_iter().map(Rule::pass_through));

        StructValidation::new(rules)
    }

    /// Prompt sequence for the fields excluded from file defaulting.
    ///
    /// Defaults shown to the operator come from `defaults` where set, and fall
    /// back to m5.large / 2 / 5.
    pub fn prompt_validation(
        skip_populated_fields: bool,
        prompt_instance_type: bool,
        defaults: Option<&ClusterConfig>,
    ) -> PromptValidation<ClusterConfig> {
        let instance_type = defaults
            .and_then(|d| d.instance_type.clone())
            .unwrap_or_else(|| DEFAULT_INSTANCE_TYPE.to_string());
        let min_instances = defaults
            .and_then(|d| d.min_instances)
            .unwrap_or(DEFAULT_MIN_INSTANCES);
        let max_instances = defaults
            .and_then(|d| d.max_instances)
            .unwrap_or(DEFAULT_MAX_INSTANCES);

        let mut items = Vec::new();

        if prompt_instance_type {
            items.push(PromptItem {
                label: "AWS instance type",
                rule: Rule::optional_string(
                    "instance_type",
                    |c| &mut c.instance_type,
                    StringRule::with_default(instance_type)
                        .required()
                        .validator(validate_instance_type),
                ),
            });
        }

        items.push(PromptItem {
            label: "Min instances",
            rule: Rule::optional_int(
                "min_instances",
                |c| &mut c.min_instances,
                IntRule::with_default(min_instances).required().greater_than(0),
            ),
        });
        items.push(PromptItem {
            label: "Max instances",
            rule: Rule::optional_int(
                "max_instances",
                |c| &mut c.max_instances,
                IntRule::with_default(max_instances).required().greater_than(0),
            ),
        });

        PromptValidation {
            skip_populated_fields,
            items,
        }
    }

    /// Validate a loose document into a cluster config, collecting every field error
    pub fn from_document(document: &Document, version: &str) -> Result<Self, FieldErrors> {
        Self::validation(version).validate(document)
    }

    /// Apply file defaults in place. Prompted fields are left untouched.
    pub fn set_file_defaults(&mut self, version: &str) -> crate::Result<()> {
        let errors = Self::validation(version).apply(self, &Document::new());
        match errors.into_vec().into_iter().next() {
            Some(first) => Err(first.into()),
            None => Ok(()),
        }
    }

    /// Cluster config holding only file defaults
    pub fn file_defaults(version: &str) -> crate::Result<Self> {
        let mut config = Self::default();
        config.set_file_defaults(version)?;
        Ok(config)
    }
}

/// A cluster config whose prompted fields and bucket are all present.
///
/// Only obtainable through [`TryFrom<ClusterConfig>`], so an
/// [`InternalClusterConfig`] can never wrap a partially resolved config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClusterConfig", into = "ClusterConfig")]
pub struct ResolvedClusterConfig(ClusterConfig);

impl ResolvedClusterConfig {
    pub fn instance_type(&self) -> &str {
        self.0.instance_type.as_deref().unwrap_or_default()
    }

    pub fn min_instances(&self) -> i64 {
        self.0.min_instances.unwrap_or_default()
    }

    pub fn max_instances(&self) -> i64 {
        self.0.max_instances.unwrap_or_default()
    }

    pub fn into_inner(self) -> ClusterConfig {
        self.0
    }
}

impl TryFrom<ClusterConfig> for ResolvedClusterConfig {
    type Error = ClusterConfigError;

    fn try_from(config: ClusterConfig) -> Result<Self, Self::Error> {
        let missing = if config.instance_type.is_none() {
            Some("instance_type")
        } else if config.min_instances.is_none() {
            Some("min_instances")
        } else if config.max_instances.is_none() {
            Some("max_instances")
        } else if config.bucket.is_empty() {
            Some("bucket")
        } else {
            None
        };

        match missing {
            Some(key) => Err(FieldError::new(key, FieldErrorKind::MissingRequired).into()),
            None => Ok(Self(config)),
        }
    }
}

impl From<ResolvedClusterConfig> for ClusterConfig {
    fn from(resolved: ResolvedClusterConfig) -> Self {
        resolved.0
    }
}

impl Deref for ResolvedClusterConfig {
    type Target = ClusterConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Resolved cluster config plus the identity assigned at admission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalClusterConfig {
    #[serde(flatten)]
    cluster_config: ResolvedClusterConfig,
    id: String,
    api_version: String,
    operator_in_cluster: bool,
}

impl InternalClusterConfig {
    /// Admit a resolved config under a freshly generated identifier
    pub fn new(
        cluster_config: ResolvedClusterConfig,
        api_version: impl Into<String>,
        operator_in_cluster: bool,
    ) -> Self {
        Self::with_id(
            cluster_config,
            uuid::Uuid::new_v4().to_string(),
            api_version,
            operator_in_cluster,
        )
    }

    pub fn with_id(
        cluster_config: ResolvedClusterConfig,
        id: impl Into<String>,
        api_version: impl Into<String>,
        operator_in_cluster: bool,
    ) -> Self {
        Self {
            cluster_config,
            id: id.into(),
            api_version: api_version.into(),
            operator_in_cluster,
        }
    }

    pub fn cluster_config(&self) -> &ResolvedClusterConfig {
        &self.cluster_config
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn operator_in_cluster(&self) -> bool {
        self.operator_in_cluster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::prompt::ScriptedPrompter;
    use serde_json::json;

    const VERSION: &str = "0.10.0";

    fn document(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Document::new(),
        }
    }

    fn resolved() -> ResolvedClusterConfig {
        let mut config = ClusterConfig::file_defaults(VERSION).unwrap();
        config.instance_type = Some("m5.large".to_string());
        config.min_instances = Some(2);
        config.max_instances = Some(5);
        config.bucket = "cortex-2a33349e7e".to_string();
        ResolvedClusterConfig::try_from(config).unwrap()
    }

    #[test]
    fn test_file_defaults() {
        let config = ClusterConfig::file_defaults(VERSION).unwrap();

        assert_eq!(config.cluster_name, "cortex");
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.log_group, "cortex");
        assert_eq!(config.bucket, "");
        assert_eq!(config.instance_volume_size, 50);
        assert!(config.telemetry);
        assert!(config.instance_type.is_none());
        assert!(config.min_instances.is_none());
        assert!(config.max_instances.is_none());
        assert_eq!(config.image_operator, "cortexlabs/operator:0.10.0");
        assert_eq!(config.image_istio_galley, "cortexlabs/istio-galley:0.10.0");
    }

    #[test]
    fn test_every_image_is_version_stamped() {
        let config = ClusterConfig::file_defaults("9.9.9").unwrap();
        let value = serde_json::to_value(&config).unwrap();
        let images: Vec<_> = value
            .as_object()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with("image_"))
            .collect();

        assert_eq!(images.len(), 19);
        for (key, image) in images {
            let image = image.as_str().unwrap();
            assert!(image.starts_with("cortexlabs/"), "{} = {}", key, image);
            assert!(image.ends_with(":9.9.9"), "{} = {}", key, image);
        }
    }

    #[test]
    fn test_validate_instance_type() {
        for too_small in ["t3.nano", "t2.micro", "t3.small", "small"] {
            assert_eq!(
                validate_instance_type(too_small),
                Err(FieldErrorKind::InstanceTypeTooSmall)
            );
        }
        for ok in ["m5.large", "p2.xlarge", "t3.Small", "t3.smaller"] {
            assert_eq!(validate_instance_type(ok), Ok(ok.to_string()));
        }
    }

    #[test]
    fn test_pass_through_keys_do_not_error() {
        let doc = document(json!({
            "aws_access_key_id": "AKIA",
            "aws_secret_access_key": 42,
            "cortex_aws_access_key_id": ["anything"],
            "cortex_aws_secret_access_key": {"nested": true},
        }));
        let config = ClusterConfig::from_document(&doc, VERSION).unwrap();
        assert_eq!(config, ClusterConfig::file_defaults(VERSION).unwrap());
    }

    #[test]
    fn test_volume_size_boundaries() {
        for (size, ok) in [(19, false), (20, true), (16384, true), (16385, false)] {
            let doc = document(json!({ "instance_volume_size": size }));
            let result = ClusterConfig::from_document(&doc, VERSION);
            assert_eq!(result.is_ok(), ok, "size {}", size);
        }
    }

    #[test]
    fn test_document_errors_are_batched() {
        let doc = document(json!({
            "instance_type": "t2.micro",
            "min_instances": 0,
            "max_instances": 0,
            "cluster_name": "",
            "telemetry": "sometimes",
        }));
        let errors = ClusterConfig::from_document(&doc, VERSION).unwrap_err();

        let keys: Vec<_> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["instance_type", "min_instances", "max_instances", "cluster_name", "telemetry"]
        );
        assert_eq!(
            errors.first().map(|e| &e.kind),
            Some(&FieldErrorKind::InstanceTypeTooSmall)
        );
    }

    #[test]
    fn test_min_greater_than_max_is_accepted() {
        let doc = document(json!({ "min_instances": 10, "max_instances": 3 }));
        let config = ClusterConfig::from_document(&doc, VERSION).unwrap();
        assert_eq!(config.min_instances, Some(10));
        assert_eq!(config.max_instances, Some(3));
    }

    #[test]
    fn test_prompt_order_and_fallback_defaults() {
        let prompts = ClusterConfig::prompt_validation(false, true, None);
        assert_eq!(prompts.labels(), vec!["AWS instance type", "Min instances", "Max instances"]);
        let defaults: Vec<_> = prompts
            .items
            .iter()
            .map(|item| item.rule.default_text())
            .collect();
        assert_eq!(
            defaults,
            vec![Some("m5.large".to_string()), Some("2".to_string()), Some("5".to_string())]
        );

        let without_type = ClusterConfig::prompt_validation(false, false, None);
        assert_eq!(without_type.labels(), vec!["Min instances", "Max instances"]);
    }

    #[test]
    fn test_prompt_defaults_from_existing_config() {
        let existing = ClusterConfig {
            instance_type: Some("p2.xlarge".to_string()),
            min_instances: Some(1),
            ..ClusterConfig::default()
        };
        let prompts = ClusterConfig::prompt_validation(false, true, Some(&existing));
        let mut config = ClusterConfig::default();
        let mut prompter = ScriptedPrompter::new(["", "", ""]);
        prompts.run(&mut config, &mut prompter).unwrap();

        assert_eq!(config.instance_type.as_deref(), Some("p2.xlarge"));
        assert_eq!(config.min_instances, Some(1));
        assert_eq!(config.max_instances, Some(5));
    }

    #[test]
    fn test_prompted_instance_type_is_validated() {
        let prompts = ClusterConfig::prompt_validation(false, true, None);
        let mut config = ClusterConfig::default();
        let mut prompter = ScriptedPrompter::new(["t3.nano"]);
        let err = prompts.run(&mut config, &mut prompter).unwrap_err();

        assert_eq!(
            err.first_field_error().map(|e| &e.kind),
            Some(&FieldErrorKind::InstanceTypeTooSmall)
        );
        assert!(config.instance_type.is_none());
    }

    #[test]
    fn test_resolved_requires_prompted_fields_and_bucket() {
        let mut config = resolved().into_inner();
        config.bucket.clear();
        let err = ResolvedClusterConfig::try_from(config).unwrap_err();
        assert_eq!(err.first_field_error().map(|e| e.key.as_str()), Some("bucket"));

        let err = ResolvedClusterConfig::try_from(ClusterConfig::default()).unwrap_err();
        assert_eq!(
            err.first_field_error().map(|e| e.key.as_str()),
            Some("instance_type")
        );
    }

    #[test]
    fn test_internal_config_serializes_flat() {
        let internal = InternalClusterConfig::with_id(resolved(), "abc", "0.10.0", true);
        let value = serde_json::to_value(&internal).unwrap();

        assert_eq!(value["id"], "abc");
        assert_eq!(value["api_version"], "0.10.0");
        assert_eq!(value["operator_in_cluster"], true);
        assert_eq!(value["instance_type"], "m5.large");
        assert_eq!(value["bucket"], "cortex-2a33349e7e");

        let back: InternalClusterConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, internal);
    }

    #[test]
    fn test_internal_config_rejects_unresolved_document() {
        let value = json!({
            "id": "abc",
            "api_version": "0.10.0",
            "operator_in_cluster": false,
            "cluster_name": "cortex",
        });
        assert!(serde_json::from_value::<InternalClusterConfig>(value).is_err());
    }

    #[test]
    fn test_new_assigns_unique_ids() {
        let first = InternalClusterConfig::new(resolved(), "0.10.0", false);
        let second = InternalClusterConfig::new(resolved(), "0.10.0", false);
        assert_ne!(first.id(), second.id());
        assert_eq!(first.cluster_config().instance_type(), "m5.large");
    }
}
