//! Fraud Risk Dashboard - Main Entry Point
//!
//! Scores single transactions from the command line, or streams a simulated
//! feed of scored transactions driven by a fixed heartbeat.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fraud_risk_dashboard::{
    config::AppConfig,
    console::{self, USAGE},
    driver::{Command, DashboardEvent, FeedDriver},
    feed::FeedManager,
    metrics::RunningStats,
    types::Transaction,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "fraud-dashboard", version, about = "Rule-based fraud risk dashboard")]
struct Cli {
    /// Configuration file (defaults to config/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random source, for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Score a single transaction
    Analyze {
        #[arg(long)]
        amount: f64,
        /// Customer's average daily spend
        #[arg(long, default_value_t = console::DEFAULT_AVG_DAILY_AMOUNT)]
        avg_daily: f64,
        #[arg(long)]
        foreign: bool,
        /// Counterparty in a high-risk country
        #[arg(long)]
        high_risk: bool,
        #[arg(long)]
        declined: bool,
        /// Refused transactions today
        #[arg(long, default_value_t = 0)]
        refusals: u32,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stream simulated transactions; control it with console commands
    Stream {
        /// Start streaming immediately
        #[arg(long)]
        autostart: bool,
        /// Heartbeat interval override in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.driver.seed = Some(seed);
    }

    init_logging(&config)?;

    match cli.command {
        Mode::Analyze {
            amount,
            avg_daily,
            foreign,
            high_risk,
            declined,
            refusals,
            json,
        } => {
            let tx = Transaction::new(amount, avg_daily)
                .foreign(foreign)
                .high_risk_country(high_risk)
                .declined(declined)
                .refusals(refusals);
            analyze(&config, tx, json)
        }
        Mode::Stream { autostart, tick_ms } => {
            if let Some(tick_ms) = tick_ms {
                config.driver.tick_interval_ms = tick_ms;
            }
            config.driver.autostart |= autostart;
            config.validate()?;
            stream(config).await
        }
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("fraud_risk_dashboard={}", config.logging.level).parse()?,
    );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn analyze(config: &AppConfig, tx: Transaction, json: bool) -> Result<()> {
    tx.validate()?;

    let mut manager = FeedManager::new(config)?;
    let result = manager.submit_manual_transaction(&tx);

    if json {
        let output = serde_json::json!({
            "transaction": tx,
            "result": result,
            "stats": manager.stats(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", console::render_verdict(&tx, &result));
    }
    Ok(())
}

async fn stream(config: AppConfig) -> Result<()> {
    info!("Starting Fraud Risk Dashboard feed");

    let manager = FeedManager::new(&config)?;
    let (command_tx, command_rx) = mpsc::channel(32);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    if config.driver.autostart {
        command_tx.send(Command::Start).await?;
    }

    // Blocking stdin reads live on their own thread so shutdown never waits on them
    let stdin_tx = command_tx.clone();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match console::parse_command(&line) {
                Ok(Some(command)) => {
                    let quit = command == Command::Shutdown;
                    if stdin_tx.blocking_send(command).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Rejected console input");
                    eprintln!("{e:#}\n{USAGE}");
                }
            }
        }
    });

    let ctrl_c_tx = command_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ctrl_c_tx.send(Command::Shutdown).await;
        }
    });
    drop(command_tx);

    let mut streaming = config.driver.autostart;
    let renderer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                DashboardEvent::FeedUpdated { visible, stats, .. } => {
                    println!("{}\n", console::render_feed(&visible, &stats, streaming));
                }
                DashboardEvent::Analysis {
                    transaction,
                    result,
                    stats,
                } => {
                    println!("{}", console::render_verdict(&transaction, &result));
                    println!("{}\n", stats.summary_line());
                }
                DashboardEvent::StreamingChanged(now_streaming) => {
                    streaming = now_streaming;
                    if streaming {
                        println!("🟢 Feed active - generating transactions automatically\n");
                    } else {
                        println!("⏸️  Feed paused - type 'start' to resume\n");
                    }
                }
                DashboardEvent::Reset => {
                    streaming = false;
                    let panel =
                        console::render_feed(std::iter::empty(), &RunningStats::default(), false);
                    println!("{panel}\n");
                }
                DashboardEvent::Stats(stats) => {
                    stats.print_summary();
                    println!("{}\n", stats.summary_line());
                }
            }
        }
    });

    println!("{USAGE}\n");
    let tick_interval: Duration = config.driver.tick_interval();
    let manager = FeedDriver::new(manager, tick_interval)
        .run(command_rx, event_tx)
        .await;

    renderer.await?;

    info!("Dashboard shutting down...");
    manager.stats().print_summary();

    Ok(())
}
