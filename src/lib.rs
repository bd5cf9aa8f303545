pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{RetryConfig, RetryingSource, SimulatedSource};
pub use config::toml_config::TomlConfig;
pub use core::{
    engine::{Engine, RunReport},
    ingestion::IngestionFanOut,
    pipeline::Pipeline,
};
pub use domain::model::{Dataset, Record};
pub use domain::ports::{Source, Step};
pub use utils::error::{PipelineError, Result};
