use crate::core::{Record, Source};
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// 模擬的外部 API：固定延遲後回傳固定的記錄，或回報設定好的失敗訊息
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    name: String,
    latency: Duration,
    records: Vec<Record>,
    failure: Option<String>,
}

impl SimulatedSource {
    pub fn new(name: impl Into<String>, latency: Duration, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            latency,
            records,
            failure: None,
        }
    }

    pub fn failing(name: impl Into<String>, latency: Duration, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency,
            records: Vec::new(),
            failure: Some(message.into()),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl Source for SimulatedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        tracing::debug!("Fetching from '{}' (latency {:?})", self.name, self.latency);
        tokio::time::sleep(self.latency).await;

        if let Some(message) = &self.failure {
            return Err(PipelineError::source_failure(&self.name, message));
        }
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;

    #[tokio::test]
    async fn test_returns_records_after_latency() {
        let record = Record::from_json(json!({"id": 1, "value": 10})).unwrap();
        let source = SimulatedSource::new("source_a", Duration::from_millis(20), vec![record.clone()]);

        let start = Instant::now();
        let records = source.fetch().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(records, vec![record]);
        assert_eq!(source.record_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_source_reports_its_name() {
        let source = SimulatedSource::failing("flaky", Duration::ZERO, "503 Service Unavailable");
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.to_string(), "Source 'flaky' failed: 503 Service Unavailable");
    }
}
