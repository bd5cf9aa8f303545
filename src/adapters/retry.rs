//! Retry wrapper for sources.
//!
//! Opt-in only: a fan-out built from plain sources never retries.

use crate::core::{Record, Source};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self::default()
            .with_max_attempts(max_attempts)
            .with_delay(delay)
    }

    /// Values below 1 are clamped: the first attempt always runs.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct RetryingSource<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: Source> RetryingSource<S> {
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl<S: Source> Source for RetryingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        let mut attempt = 1;
        loop {
            match self.inner.fetch().await {
                Ok(records) => return Ok(records),
                Err(e) if attempt < self.config.max_attempts => {
                    tracing::warn!(
                        "[RETRY] {} attempt {}/{} failed: {}",
                        self.inner.name(),
                        attempt,
                        self.config.max_attempts,
                        e
                    );
                    attempt += 1;
                    tokio::time::sleep(self.config.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PipelineError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakySource {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakySource {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Source for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch(&self) -> Result<Vec<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(PipelineError::source_failure("flaky", "network error"));
            }
            Ok(vec![Record::new()])
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let source = RetryingSource::new(FlakySource::new(2), RetryConfig::new(3, Duration::ZERO));
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let source = RetryingSource::new(FlakySource::new(5), RetryConfig::new(2, Duration::ZERO));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceFailure { .. }));
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_builder_clamps_attempts() {
        let config = RetryConfig::default()
            .with_max_attempts(0)
            .with_delay(Duration::from_millis(250));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.delay, Duration::from_millis(250));

        assert_eq!(RetryConfig::default().with_max_attempts(4).max_attempts, 4);
    }

    #[tokio::test]
    async fn test_default_config_means_single_attempt() {
        let source = RetryingSource::new(FlakySource::new(1), RetryConfig::default());
        assert!(source.fetch().await.is_err());
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 1);
    }
}
