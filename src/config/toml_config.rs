use crate::adapters::{RetryConfig, RetryingSource, SimulatedSource};
use crate::core::ingestion::IngestionFanOut;
use crate::core::pipeline::Pipeline;
use crate::core::processors::{
    Cleaner, CountLogger, FeatureEngineer, MetricsCalculator, Transformer, Validator,
    DEFAULT_VALUE_FIELD,
};
use crate::core::{Record, Source, Step};
use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// 單一來源的模擬延遲上限（毫秒）
pub const MAX_LATENCY_MS: u64 = 600_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineInfo,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub name: String,
    pub description: Option<String>,
    pub value_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default)]
    pub latency_ms: u64,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub fail_with: Option<String>,
    #[serde(default)]
    pub records: Vec<HashMap<String, serde_json::Value>>,
}

/// 步驟種類是封閉集合，由 `type` 欄位決定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepConfig {
    Cleaner,
    Validator,
    CountLogger,
    Transformer { multiplier: f64 },
    FeatureEngineer,
    MetricsCalculator,
}

impl StepConfig {
    /// 是否輸出彙總記錄（之後不能再接序列步驟）
    pub fn produces_summary(&self) -> bool {
        matches!(self, StepConfig::MetricsCalculator)
    }

    pub fn build(&self, field: &str) -> Box<dyn Step> {
        match self {
            StepConfig::Cleaner => Box::new(Cleaner::for_field(field)),
            StepConfig::Validator => Box::new(Validator),
            StepConfig::CountLogger => Box::new(CountLogger),
            StepConfig::Transformer { multiplier } => {
                Box::new(Transformer::for_field(*multiplier, field))
            }
            StepConfig::FeatureEngineer => Box::new(FeatureEngineer::for_field(field)),
            StepConfig::MetricsCalculator => Box::new(MetricsCalculator::for_field(field)),
        }
    }
}

impl SourceConfig {
    pub fn build(&self) -> Box<dyn Source> {
        let latency = Duration::from_millis(self.latency_ms);
        let source = match &self.fail_with {
            Some(message) => SimulatedSource::failing(&self.name, latency, message),
            None => {
                let records = self
                    .records
                    .iter()
                    .map(|data| Record { data: data.clone() })
                    .collect();
                SimulatedSource::new(&self.name, latency, records)
            }
        };

        match self.retry_attempts {
            Some(attempts) if attempts > 1 => {
                let config = RetryConfig::default()
                    .with_max_attempts(attempts)
                    .with_delay(Duration::from_millis(self.retry_delay_ms.unwrap_or(0)));
                Box::new(RetryingSource::new(source, config))
            }
            _ => Box::new(source),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PipelineError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| PipelineError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${SOURCE_LATENCY_MS})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| PipelineError::config(format!("invalid placeholder pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn value_field(&self) -> &str {
        self.pipeline
            .value_field
            .as_deref()
            .unwrap_or(DEFAULT_VALUE_FIELD)
    }

    /// 覆寫所有 Transformer 的倍率
    pub fn override_multiplier(&mut self, multiplier: f64) {
        for step in &mut self.steps {
            if let StepConfig::Transformer { multiplier: m } = step {
                *m = multiplier;
            }
        }
    }

    pub fn build_ingestion(&self) -> IngestionFanOut {
        IngestionFanOut::new(self.sources.iter().map(SourceConfig::build).collect())
    }

    pub fn build_pipeline(&self, instrumented: bool) -> Pipeline {
        let field = self.value_field();
        let steps: Vec<Box<dyn Step>> = self.steps.iter().map(|s| s.build(field)).collect();
        if instrumented {
            Pipeline::instrumented(steps)
        } else {
            Pipeline::new(steps)
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_non_empty_string("pipeline.value_field", self.value_field())?;

        for source in &self.sources {
            validation::validate_non_empty_string("sources.name", &source.name)?;
            validation::validate_range("sources.latency_ms", source.latency_ms, 0, MAX_LATENCY_MS)?;
            if let Some(attempts) = source.retry_attempts {
                validation::validate_positive_number("sources.retry_attempts", attempts, 1)?;
            }
            if let Some(delay) = source.retry_delay_ms {
                validation::validate_range("sources.retry_delay_ms", delay, 0, MAX_LATENCY_MS)?;
            }
        }
        validation::validate_unique_names("sources.name", self.sources.iter().map(|s| s.name.as_str()))?;

        for step in &self.steps {
            if let StepConfig::Transformer { multiplier } = step {
                validation::validate_finite("steps.multiplier", *multiplier)?;
            }
        }

        // 彙總步驟只能放在最後
        if let Some(pos) = self.steps.iter().position(StepConfig::produces_summary) {
            if pos + 1 != self.steps.len() {
                return Err(PipelineError::config(format!(
                    "metrics_calculator at position {} must be the last step, found {} more after it",
                    pos + 1,
                    self.steps.len() - pos - 1
                )));
            }
        }

        Ok(())
    }
}
