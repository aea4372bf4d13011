//! Feed and session state management.
//!
//! [`FeedManager`] owns one [`FeedSession`] and is the only thing that
//! mutates it: manual analyses update the counters, simulated arrivals update
//! the counters and the bounded history.

use crate::config::AppConfig;
use crate::generator::TransactionGenerator;
use crate::metrics::RunningStats;
use crate::scorer::RiskScorer;
use crate::types::feed::FeedEntry;
use crate::types::score::{RiskLevel, ScoreResult};
use crate::types::transaction::Transaction;
use anyhow::Result;
use chrono::{Local, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Mutable state of one dashboard session
#[derive(Debug, Clone)]
pub struct FeedSession {
    /// Recent simulated entries, newest first
    history: VecDeque<FeedEntry>,
    stats: RunningStats,
    streaming: bool,
    /// Last id handed out; the next entry gets this plus one
    last_transaction_id: u64,
}

impl FeedSession {
    pub fn new(initial_transaction_id: u64) -> Self {
        Self {
            history: VecDeque::new(),
            stats: RunningStats::new(),
            streaming: false,
            last_transaction_id: initial_transaction_id,
        }
    }

    pub fn history(&self) -> &VecDeque<FeedEntry> {
        &self.history
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn last_transaction_id(&self) -> u64 {
        self.last_transaction_id
    }
}

fn local_time_of_day() -> NaiveTime {
    Local::now().time()
}

/// Scores transactions and keeps the session state up to date
pub struct FeedManager<R = StdRng> {
    scorer: RiskScorer,
    generator: TransactionGenerator,
    session: FeedSession,
    rng: R,
    clock: fn() -> NaiveTime,
    history_capacity: usize,
    visible_entries: usize,
    initial_transaction_id: u64,
}

impl FeedManager<StdRng> {
    /// Create a manager seeded from `driver.seed`, or from entropy when unset
    pub fn new(config: &AppConfig) -> Result<Self> {
        let rng = match config.driver.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_seed(config: &AppConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FeedManager<R> {
    /// Create a manager drawing all randomness from `rng`.
    ///
    /// Fails when `config` does not pass [`AppConfig::validate`]; probabilities
    /// and amount bands are sampled directly.
    pub fn with_rng(config: &AppConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: RiskScorer::new(&config.scoring),
            generator: TransactionGenerator::new(&config.feed),
            session: FeedSession::new(config.feed.initial_transaction_id),
            rng,
            clock: local_time_of_day,
            history_capacity: config.feed.history_capacity,
            visible_entries: config.feed.visible_entries,
            initial_transaction_id: config.feed.initial_transaction_id,
        })
    }

    /// Replace the wall clock used to timestamp feed entries
    pub fn with_clock(mut self, clock: fn() -> NaiveTime) -> Self {
        self.clock = clock;
        self
    }

    /// Score a user-submitted transaction.
    ///
    /// Counts towards the statistics but never enters the feed history.
    pub fn submit_manual_transaction(&mut self, tx: &Transaction) -> ScoreResult {
        let result = self.scorer.score(tx, &mut self.rng);
        self.session.stats.record(result.level);

        info!(
            amount = tx.amount,
            score = format!("{:.1}", result.score),
            risk_level = %result.level,
            "Manual transaction analysed"
        );

        result
    }

    /// Generate, score and record one simulated transaction
    pub fn generate_simulated_transaction(&mut self) -> FeedEntry {
        let tx = self.generator.generate(&mut self.rng);
        let result = self.scorer.score(&tx, &mut self.rng);
        self.session.stats.record(result.level);

        self.session.last_transaction_id += 1;
        let entry = FeedEntry::new(
            (self.clock)(),
            self.session.last_transaction_id,
            tx.amount,
            result.level,
            result.score,
        );

        self.session.history.push_front(entry.clone());
        self.session.history.truncate(self.history_capacity);

        if result.level == RiskLevel::Fraud {
            info!(
                transaction_id = entry.id,
                amount = entry.amount,
                score = format!("{:.1}", result.score),
                rules = ?result.triggered_rules,
                "Simulated fraud detected"
            );
        } else {
            debug!(
                transaction_id = entry.id,
                amount = entry.amount,
                score = format!("{:.1}", result.score),
                risk_level = %result.level,
                "Simulated transaction scored"
            );
        }

        entry
    }

    pub fn start(&mut self) {
        if !self.session.streaming {
            self.session.streaming = true;
            info!("Feed streaming started");
        }
    }

    pub fn pause(&mut self) {
        if self.session.streaming {
            self.session.streaming = false;
            info!("Feed streaming paused");
        }
    }

    /// Clear history and counters and stop streaming
    pub fn reset(&mut self) {
        self.session = FeedSession::new(self.initial_transaction_id);
        info!(
            initial_transaction_id = self.initial_transaction_id,
            "Feed session reset"
        );
    }

    /// Heartbeat: produce one simulated entry while streaming, nothing otherwise
    pub fn tick(&mut self) -> Option<FeedEntry> {
        if self.session.streaming {
            Some(self.generate_simulated_transaction())
        } else {
            None
        }
    }

    pub fn session(&self) -> &FeedSession {
        &self.session
    }

    pub fn stats(&self) -> &RunningStats {
        self.session.stats()
    }

    /// All retained entries, newest first
    pub fn history(&self) -> impl Iterator<Item = &FeedEntry> {
        self.session.history.iter()
    }

    /// The entries surfaced to the display, newest first
    pub fn visible_history(&self) -> impl Iterator<Item = &FeedEntry> {
        self.session.history.iter().take(self.visible_entries)
    }

    pub fn is_streaming(&self) -> bool {
        self.session.streaming
    }

    pub fn last_transaction_id(&self) -> u64 {
        self.session.last_transaction_id
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }
}
