//! Fraud Risk Dashboard Library
//!
//! Rule-based payment fraud scoring with a simulated live feed of random
//! transactions and running statistics.

pub mod config;
pub mod console;
pub mod driver;
pub mod feed;
pub mod generator;
pub mod metrics;
pub mod scorer;
pub mod types;

pub use config::AppConfig;
pub use driver::{Command, DashboardEvent, FeedDriver};
pub use feed::{FeedManager, FeedSession};
pub use generator::TransactionGenerator;
pub use metrics::RunningStats;
pub use scorer::{NoiseSource, RiskScorer};
pub use types::{FeedEntry, RiskLevel, ScoreResult, Transaction};
