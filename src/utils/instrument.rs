use crate::domain::model::Dataset;
use crate::domain::ports::Step;
use crate::utils::error::Result;
use std::future::Future;
use std::time::Instant;

/// 包一層計時與日誌的 Step，輸出與內層步驟完全相同
pub struct Instrumented<S> {
    inner: S,
}

pub fn instrument<S: Step>(step: S) -> Instrumented<S> {
    Instrumented { inner: step }
}

impl<S: Step> Instrumented<S> {
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Step> Step for Instrumented<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        let name = self.inner.name();
        tracing::info!("Started: {}", name);
        let start = Instant::now();

        let result = self.inner.transform(input);

        match &result {
            Ok(_) => tracing::info!("Finished: {} ({:.2?})", name, start.elapsed()),
            Err(e) => tracing::warn!("Failed: {} after {:.2?}: {}", name, start.elapsed(), e),
        }
        result
    }
}

/// 非同步版本：記錄開始、結束與耗時
pub async fn measure<F, T>(label: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tracing::info!("Started: {}", label);
    let start = Instant::now();

    let result = fut.await;

    match &result {
        Ok(_) => tracing::info!("Finished: {} ({:.2?})", label, start.elapsed()),
        Err(e) => tracing::warn!("Failed: {} after {:.2?}: {}", label, start.elapsed(), e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use crate::utils::error::PipelineError;
    use serde_json::json;

    struct Doubler;

    impl Step for Doubler {
        fn name(&self) -> &str {
            "Doubler"
        }

        fn transform(&self, input: &Dataset) -> Result<Dataset> {
            let records = input.records().unwrap_or_default();
            Ok(Dataset::Records(
                records.iter().chain(records.iter()).cloned().collect(),
            ))
        }
    }

    #[test]
    fn test_instrumented_step_keeps_output_and_name() {
        let input = Dataset::Records(vec![Record::from_json(json!({"id": 1})).unwrap()]);
        let plain = Doubler.transform(&input).unwrap();
        let wrapped = instrument(Doubler);

        assert_eq!(wrapped.name(), "Doubler");
        assert_eq!(wrapped.transform(&input).unwrap(), plain);
    }

    #[tokio::test]
    async fn test_measure_passes_errors_through() {
        let ok: Result<u32> = measure("ok", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: Result<u32> =
            measure("bad", async { Err(PipelineError::source_failure("s", "down")) }).await;
        assert!(matches!(err, Err(PipelineError::SourceFailure { .. })));
    }
}
