use crate::core::ingestion::IngestionFanOut;
use crate::core::pipeline::Pipeline;
use crate::core::{Dataset, Record};
use crate::utils::error::Result;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub raw_records: Vec<Record>,
    pub output: Dataset,
    pub elapsed: Duration,
}

/// 先完成擷取（屏障），再把結果交給 pipeline 跑一次
pub struct Engine {
    ingestion: IngestionFanOut,
    pipeline: Pipeline,
}

impl Engine {
    pub fn new(ingestion: IngestionFanOut, pipeline: Pipeline) -> Self {
        Self {
            ingestion,
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn ingestion(&self) -> &IngestionFanOut {
        &self.ingestion
    }

    #[tracing::instrument(
        name = "run",
        skip_all,
        fields(sources = self.ingestion.len(), steps = self.pipeline.len())
    )]
    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        tracing::info!("Starting ingestion from {} sources", self.ingestion.len());

        // Ingest
        let raw_records = self.ingestion.ingest().await?;
        tracing::info!("Ingested {} records", raw_records.len());

        // Process
        tracing::info!("Running pipeline: {}", self.pipeline.step_names().join(" -> "));
        let output = self.pipeline.run(raw_records.clone())?;

        Ok(RunReport {
            raw_records,
            output,
            elapsed: start.elapsed(),
        })
    }
}
