use crate::core::{Dataset, Record, Step};
use crate::utils::error::Result;
use crate::utils::instrument::instrument;
use std::time::Instant;

/// 依建構時的順序執行所有步驟。建構後步驟清單不可變，run 之間不保留狀態。
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    pub fn new(steps: Vec<Box<dyn Step>>) -> Self {
        Self { steps }
    }

    /// 每個步驟都包上計時與日誌
    pub fn instrumented(steps: Vec<Box<dyn Step>>) -> Self {
        Self {
            steps: steps
                .into_iter()
                .map(|step| Box::new(instrument(step)) as Box<dyn Step>)
                .collect(),
        }
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&self, records: Vec<Record>) -> Result<Dataset> {
        self.run_dataset(Dataset::Records(records))
    }

    /// 任一步驟失敗就中止，不回傳部分結果
    pub fn run_dataset(&self, input: Dataset) -> Result<Dataset> {
        let start = Instant::now();
        tracing::debug!("Running pipeline with {} steps", self.steps.len());

        let mut current = input;
        for step in &self.steps {
            tracing::info!("[PIPELINE] Executing step: {}", step.name());
            current = step.transform(&current)?;
        }

        tracing::debug!("Pipeline finished in {:.2?}", start.elapsed());
        Ok(current)
    }
}
