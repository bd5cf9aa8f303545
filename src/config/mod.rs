#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use serde_json::json;
use std::collections::HashMap;
use self::toml_config::{PipelineInfo, SourceConfig, StepConfig, TomlConfig};

fn demo_records(value: serde_json::Value) -> Vec<HashMap<String, serde_json::Value>> {
    serde_json::from_value(value).unwrap_or_default()
}

/// 未指定設定檔時使用的內建示範：兩個不同延遲的來源，四個步驟
pub fn demo_config() -> TomlConfig {
    TomlConfig {
        pipeline: PipelineInfo {
            name: "demo".to_string(),
            description: Some("Two simulated APIs feeding clean/scale/normalise/metrics".to_string()),
            value_field: None,
        },
        sources: vec![
            SourceConfig {
                name: "source_a".to_string(),
                latency_ms: 1000,
                retry_attempts: None,
                retry_delay_ms: None,
                fail_with: None,
                records: demo_records(json!([
                    {"id": 1, "value": 10},
                    {"id": 2, "value": null}
                ])),
            },
            SourceConfig {
                name: "source_b".to_string(),
                latency_ms: 1500,
                retry_attempts: None,
                retry_delay_ms: None,
                fail_with: None,
                records: demo_records(json!([
                    {"id": 3, "value": 30},
                    {"id": 4, "value": 0}
                ])),
            },
        ],
        steps: vec![
            StepConfig::Cleaner,
            StepConfig::Transformer { multiplier: 2.0 },
            StepConfig::FeatureEngineer,
            StepConfig::MetricsCalculator,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    #[test]
    fn test_demo_config_is_valid() {
        let config = demo_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources[0].records.len(), 2);
        assert!(config.sources[0].records[1]["value"].is_null());
    }
}
