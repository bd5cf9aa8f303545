use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ingest-pipeline")]
#[command(about = "Concurrent ingestion feeding a linear processing pipeline")]
pub struct CliConfig {
    /// Path to a TOML pipeline file; the built-in demo runs when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the multiplier of every transformer step
    #[arg(long)]
    pub multiplier: Option<f64>,

    /// Disable per-step timing and logging
    #[arg(long)]
    pub no_instrument: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
