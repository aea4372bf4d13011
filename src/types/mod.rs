//! Type definitions for the fraud risk dashboard

pub mod feed;
pub mod score;
pub mod transaction;

pub use feed::FeedEntry;
pub use score::{RiskLevel, RiskLevelThresholds, ScoreResult};
pub use transaction::Transaction;
