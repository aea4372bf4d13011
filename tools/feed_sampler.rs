//! Feed Sampler
//!
//! Generates scored simulated transactions without the interactive dashboard,
//! printing each one as JSON. Useful for eyeballing the feed distribution.

use anyhow::Result;
use clap::Parser;
use fraud_risk_dashboard::{AppConfig, FeedManager, RiskLevel};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "feed-sampler", about = "Print scored simulated transactions")]
struct Cli {
    /// Number of transactions to generate
    #[arg(long, default_value_t = 20)]
    count: u64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between transactions in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Configuration file (defaults to config/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feed_sampler=info".parse()?)
                .add_directive("fraud_risk_dashboard=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Feed Sampler");

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.driver.seed = cli.seed;
    }

    info!(
        count = cli.count,
        seed = ?config.driver.seed,
        delay_ms = cli.delay_ms,
        "Configuration loaded"
    );

    let mut manager = FeedManager::new(&config)?;

    for i in 0..cli.count {
        let entry = manager.generate_simulated_transaction();
        println!("{}", serde_json::to_string_pretty(&entry)?);

        if (i + 1) % 10 == 0 {
            let stats = manager.stats();
            info!(
                "Generated {}/{} transactions ({} fraud, {} suspect, {} legitimate)",
                i + 1,
                cli.count,
                stats.count(RiskLevel::Fraud),
                stats.count(RiskLevel::Suspect),
                stats.count(RiskLevel::Legitimate)
            );
        }

        if cli.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(cli.delay_ms)).await;
        }
    }

    manager.stats().print_summary();
    Ok(())
}
