//! 內建的處理步驟。
//!
//! 每個步驟只讀取輸入，輸出新配置的記錄；輸入序列與其中的記錄都不會被修改。

use crate::core::{Dataset, Record, Step};
use crate::utils::error::{PipelineError, Result};
use serde_json::Value;

pub const DEFAULT_VALUE_FIELD: &str = "value";
pub const NORMALIZED_FIELD: &str = "normalized_value";

/// 取出記錄序列；若上一步已經產生彙總記錄，代表步驟順序設定錯誤
fn expect_records<'a>(step: &str, input: &'a Dataset) -> Result<&'a [Record]> {
    input.records().ok_or_else(|| {
        PipelineError::config(format!(
            "step {} expects a record sequence but received a {}",
            step,
            input.shape()
        ))
    })
}

/// 非有限的浮點數無法寫回 JSON，視為溢位
fn finite_number(step: &str, what: &str, value: f64) -> Result<Value> {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| PipelineError::arithmetic(step, format!("{} overflowed to {}", what, value)))
}

fn numeric_values(step: &str, field: &str, records: &[Record]) -> Result<Vec<f64>> {
    records
        .iter()
        .map(|record| {
            record.get_f64(field).ok_or_else(|| {
                PipelineError::validation(
                    step,
                    format!("field '{}' is missing or not numeric in {}", field, record),
                )
            })
        })
        .collect()
}

/// 移除 value 欄位不存在或為 null 的記錄
#[derive(Debug, Clone)]
pub struct Cleaner {
    field: String,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::for_field(DEFAULT_VALUE_FIELD)
    }

    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Cleaner {
    fn name(&self) -> &str {
        "Cleaner"
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        let records = expect_records(self.name(), input)?;
        let cleaned: Vec<Record> = records
            .iter()
            .filter(|record| record.has_value(&self.field))
            .cloned()
            .collect();

        tracing::debug!(
            "Cleaner kept {} of {} records",
            cleaned.len(),
            records.len()
        );
        Ok(Dataset::Records(cleaned))
    }
}

/// 將 value 欄位乘上固定倍率
#[derive(Debug, Clone)]
pub struct Transformer {
    multiplier: f64,
    field: String,
}

impl Transformer {
    pub fn new(multiplier: f64) -> Self {
        Self::for_field(multiplier, DEFAULT_VALUE_FIELD)
    }

    pub fn for_field(multiplier: f64, field: impl Into<String>) -> Self {
        Self {
            multiplier,
            field: field.into(),
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    fn scale(&self, record: &Record) -> Result<Value> {
        let value = record.get_f64(&self.field).ok_or_else(|| {
            PipelineError::validation(
                self.name(),
                format!("field '{}' is missing or not numeric in {}", self.field, record),
            )
        })?;

        // 整數乘上整數倍率時維持整數
        if let Some(int) = record.get(&self.field).and_then(Value::as_i64) {
            if self.multiplier.fract() == 0.0 && self.multiplier.abs() < i64::MAX as f64 {
                if let Some(product) = int.checked_mul(self.multiplier as i64) {
                    return Ok(Value::from(product));
                }
            }
        }
        let product = value * self.multiplier;
        finite_number(
            self.name(),
            &format!("'{}' * {}", self.field, self.multiplier),
            product,
        )
    }
}

impl Step for Transformer {
    fn name(&self) -> &str {
        "Transformer"
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        let records = expect_records(self.name(), input)?;
        let scaled = records
            .iter()
            .map(|record| Ok(record.with_field(&self.field, self.scale(record)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset::Records(scaled))
    }
}

/// 新增 normalized_value = value / max(value)
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    field: String,
}

impl FeatureEngineer {
    pub fn new() -> Self {
        Self::for_field(DEFAULT_VALUE_FIELD)
    }

    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for FeatureEngineer {
    fn name(&self) -> &str {
        "FeatureEngineer"
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        let records = expect_records(self.name(), input)?;
        if records.is_empty() {
            return Err(PipelineError::validation(
                self.name(),
                "cannot normalise an empty record sequence",
            ));
        }

        let values = numeric_values(self.name(), &self.field, records)?;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == 0.0 {
            return Err(PipelineError::arithmetic(
                self.name(),
                format!("maximum of '{}' is zero, division by zero", self.field),
            ));
        }

        let normalized = records
            .iter()
            .zip(values)
            .map(|(record, value)| {
                let ratio = finite_number(self.name(), NORMALIZED_FIELD, value / max)?;
                Ok(record.with_field(NORMALIZED_FIELD, ratio))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset::Records(normalized))
    }
}

/// 將序列彙總成 {count, min, max, avg}
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    field: String,
}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self::for_field(DEFAULT_VALUE_FIELD)
    }

    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for MetricsCalculator {
    fn name(&self) -> &str {
        "MetricsCalculator"
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        let records = expect_records(self.name(), input)?;
        if records.is_empty() {
            return Err(PipelineError::validation(
                self.name(),
                "cannot compute metrics of an empty record sequence",
            ));
        }

        let values = numeric_values(self.name(), &self.field, records)?;

        // min/max 保留原始的 JSON 值，整數不會變成浮點數
        let mut min_idx = 0;
        let mut max_idx = 0;
        for (idx, value) in values.iter().enumerate() {
            if *value < values[min_idx] {
                min_idx = idx;
            }
            if *value > values[max_idx] {
                max_idx = idx;
            }
        }
        let count = values.len() as f64;
        let sum: f64 = values.iter().sum();
        // 總和溢位時改成先除再加，平均值必定落在 min 與 max 之間
        let avg = if sum.is_finite() {
            sum / count
        } else {
            values.iter().map(|v| v / count).sum::<f64>()
        };
        let avg = finite_number(self.name(), "avg", avg)?;

        let pick = |idx: usize| records[idx].get(&self.field).cloned().unwrap_or(Value::Null);
        let summary: Record = [
            ("count", Value::from(records.len())),
            ("min", pick(min_idx)),
            ("max", pick(max_idx)),
            ("avg", avg),
        ]
        .into_iter()
        .collect();

        Ok(Dataset::Summary(summary))
    }
}

/// 空序列直接判定失敗，其餘原樣傳遞
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Step for Validator {
    fn name(&self) -> &str {
        "Validator"
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        let records = expect_records(self.name(), input)?;
        if records.is_empty() {
            return Err(PipelineError::validation(self.name(), "empty dataset"));
        }
        Ok(Dataset::Records(records.to_vec()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountLogger;

impl Step for CountLogger {
    fn name(&self) -> &str {
        "CountLogger"
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        let records = expect_records(self.name(), input)?;
        tracing::info!("Records count: {}", records.len());
        Ok(Dataset::Records(records.to_vec()))
    }
}
