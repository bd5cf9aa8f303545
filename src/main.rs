use clap::Parser;
use ingest_pipeline::config::cli::LogFormat;
use ingest_pipeline::config::demo_config;
use ingest_pipeline::utils::{logger, validation::Validate};
use ingest_pipeline::{CliConfig, Dataset, Engine, PipelineError, TomlConfig};

fn render(value: &serde_json::Value, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

fn report_failure(e: &PipelineError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 載入配置，未指定時使用內建示範
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading pipeline from: {}", path);
            TomlConfig::from_file(path).unwrap_or_else(|e| report_failure(&e))
        }
        None => {
            tracing::info!("No --config given, running the built-in demo");
            demo_config()
        }
    };

    if let Some(multiplier) = cli.multiplier {
        config.override_multiplier(multiplier);
        tracing::info!("🔧 Transformer multiplier overridden to: {}", multiplier);
    }

    if let Err(e) = config.validate() {
        report_failure(&e);
    }

    let engine = Engine::new(
        config.build_ingestion(),
        config.build_pipeline(!cli.no_instrument),
    );

    let report = match engine.run().await {
        Ok(report) => report,
        Err(e) => report_failure(&e),
    };

    println!("========== DATA INGESTION ==========");
    let raw = Dataset::Records(report.raw_records).to_sorted_json();
    println!("{}", render(&raw, cli.compact)?);

    println!("========== FINAL OUTPUT ==========");
    println!("{}", render(&report.output.to_sorted_json(), cli.compact)?);

    tracing::info!("✅ Completed in {:.2?}", report.elapsed);
    Ok(())
}
