use crate::core::{Record, Source};
use crate::utils::error::Result;
use crate::utils::instrument::measure;
use futures::future::try_join_all;

/// 同時向所有來源取資料，全部完成後依來源列出的順序串接
pub struct IngestionFanOut {
    sources: Vec<Box<dyn Source>>,
}

impl IngestionFanOut {
    pub fn new(sources: Vec<Box<dyn Source>>) -> Self {
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub async fn ingest(&self) -> Result<Vec<Record>> {
        measure("ingest_all_sources", self.fetch_all()).await
    }

    /// 所有 fetch 在同一個 task 上交錯等待，不會另外 spawn。
    /// 任一來源失敗整體即失敗，其餘尚未完成的 fetch 會被丟棄。
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        let fetches = self
            .sources
            .iter()
            .map(|source| measure(source.name(), source.fetch()));

        let data_sets = try_join_all(fetches).await?;

        for (source, data) in self.sources.iter().zip(&data_sets) {
            tracing::debug!("Source '{}' returned {} records", source.name(), data.len());
        }

        Ok(data_sets.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PipelineError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    struct DelayedSource {
        name: String,
        delay: Duration,
        ids: Vec<i64>,
    }

    #[async_trait]
    impl Source for DelayedSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch(&self) -> Result<Vec<Record>> {
            tokio::time::sleep(self.delay).await;
            Ok(self
                .ids
                .iter()
                .filter_map(|id| Record::from_json(json!({"id": id, "value": id * 10})))
                .collect())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl Source for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn fetch(&self) -> Result<Vec<Record>> {
            Err(PipelineError::source_failure("broken", "network error"))
        }
    }

    fn delayed(name: &str, delay_ms: u64, ids: Vec<i64>) -> Box<dyn Source> {
        Box::new(DelayedSource {
            name: name.to_string(),
            delay: Duration::from_millis(delay_ms),
            ids,
        })
    }

    #[tokio::test]
    async fn test_order_follows_listing_not_completion() {
        // 慢的來源列在前面，輸出仍然先放它的記錄
        let fanout = IngestionFanOut::new(vec![
            delayed("slow", 40, vec![1, 2]),
            delayed("fast", 5, vec![3]),
        ]);

        let records = fanout.ingest().await.unwrap();
        let ids: Vec<i64> = records
            .iter()
            .map(|r| r.get("id").unwrap().as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_fanout() {
        let fanout = IngestionFanOut::new(vec![delayed("ok", 5, vec![1]), Box::new(BrokenSource)]);

        let err = fanout.ingest().await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceFailure { ref source_name, .. } if source_name == "broken"));
    }

    #[tokio::test]
    async fn test_no_sources_yields_empty() {
        let fanout = IngestionFanOut::new(vec![]);
        assert!(fanout.is_empty());
        assert!(fanout.ingest().await.unwrap().is_empty());
    }

    #[test]
    fn test_source_names() {
        let fanout = IngestionFanOut::new(vec![delayed("a", 0, vec![]), delayed("b", 0, vec![])]);
        assert_eq!(fanout.source_names(), vec!["a", "b"]);
        assert_eq!(fanout.len(), 2);
    }
}
