// file: src/config/presenter.rs
// version: 1.0.0
// guid: 4248de4c-8b25-4290-a760-8c18664bc7f7

//! Operator-facing summary of a resolved cluster configuration

use super::cluster::InternalClusterConfig;
use crate::utils::table::{align_key_value, KeyValue};
use std::fmt;

impl InternalClusterConfig {
    /// Every field as a label/value row, in display order
    pub fn key_values(&self) -> Vec<KeyValue> {
        let cc = self.cluster_config();

        vec![
            KeyValue::new("cluster version", self.api_version()),
            KeyValue::new("instance type", cc.instance_type()),
            KeyValue::new("min instances", cc.min_instances()),
            KeyValue::new("max instances", cc.max_instances()),
            KeyValue::new("cluster name", &cc.cluster_name),
            KeyValue::new("region", &cc.region),
            KeyValue::new("bucket", &cc.bucket),
            KeyValue::new("log group", &cc.log_group),
            KeyValue::new("instance volume size", cc.instance_volume_size),
            KeyValue::new("telemetry", cc.telemetry),
            KeyValue::new("image_predictor_serve", &cc.image_predictor_serve),
            KeyValue::new("image_predictor_serve_gpu", &cc.image_predictor_serve_gpu),
            KeyValue::new("image_tf_serve", &cc.image_tf_serve),
            KeyValue::new("image_tf_serve_gpu", &cc.image_tf_serve_gpu),
            KeyValue::new("image_tf_api", &cc.image_tf_api),
            KeyValue::new("image_onnx_serve", &cc.image_onnx_serve),
            KeyValue::new("image_onnx_serve_gpu", &cc.image_onnx_serve_gpu),
            KeyValue::new("image_operator", &cc.image_operator),
            KeyValue::new("image_manager", &cc.image_manager),
            KeyValue::new("image_downloader", &cc.image_downloader),
            KeyValue::new("image_cluster_autoscaler", &cc.image_cluster_autoscaler),
            KeyValue::new("image_metrics_server", &cc.image_metrics_server),
            KeyValue::new("image_nvidia", &cc.image_nvidia),
            KeyValue::new("image_fluentd", &cc.image_fluentd),
            KeyValue::new("image_statsd", &cc.image_statsd),
            KeyValue::new("image_istio_proxy", &cc.image_istio_proxy),
            KeyValue::new("image_istio_pilot", &cc.image_istio_pilot),
            KeyValue::new("image_istio_citadel", &cc.image_istio_citadel),
            KeyValue::new("image_istio_galley", &cc.image_istio_galley),
        ]
    }
}

impl fmt::Display for InternalClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&align_key_value(&self.key_values(), ":", 1))
    }
}
