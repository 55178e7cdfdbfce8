//! Main entry point for the vacancy-exporter CLI

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vacancy_exporter::cli::Cli;
use vacancy_exporter::worker::RunStatus;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    // Check if JSON output is requested via environment variable
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vacancy_exporter=warn"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = cli.execute().await.map_err(|e| anyhow::anyhow!(e));

    match result {
        Ok(RunStatus::Completed) => {}
        Ok(RunStatus::Cancelled) => std::process::exit(130),
        Ok(RunStatus::Failed) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {}", e);
            std::process::exit(2);
        }
    }
}
