//! Running statistics for analysed transactions.

use crate::types::score::RiskLevel;
use serde::Serialize;
use tracing::info;

/// Cumulative counters for every scored transaction, manual or simulated.
///
/// `analyzed` always equals the sum of the three per-level counters; the only
/// mutation paths are [`RunningStats::record`] and [`RunningStats::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunningStats {
    analyzed: u64,
    frauds: u64,
    suspects: u64,
    legitimate: u64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scored transaction
    pub fn record(&mut self, level: RiskLevel) {
        self.analyzed += 1;
        match level {
            RiskLevel::Fraud => self.frauds += 1,
            RiskLevel::Suspect => self.suspects += 1,
            RiskLevel::Legitimate => self.legitimate += 1,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn analyzed(&self) -> u64 {
        self.analyzed
    }

    pub fn frauds(&self) -> u64 {
        self.frauds
    }

    pub fn suspects(&self) -> u64 {
        self.suspects
    }

    pub fn legitimate(&self) -> u64 {
        self.legitimate
    }

    /// Count for a single level
    pub fn count(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Fraud => self.frauds,
            RiskLevel::Suspect => self.suspects,
            RiskLevel::Legitimate => self.legitimate,
        }
    }

    /// Percentage of analysed transactions classified as fraud
    pub fn fraud_rate(&self) -> f64 {
        if self.analyzed > 0 {
            (self.frauds as f64 / self.analyzed as f64) * 100.0
        } else {
            0.0
        }
    }

    /// One-line rendering for the dashboard footer
    pub fn summary_line(&self) -> String {
        format!(
            "Analyzed: {}  │  Frauds: {}  │  Suspects: {}  │  Legitimate: {}  │  Fraud rate: {:.1}%",
            self.analyzed,
            self.frauds,
            self.suspects,
            self.legitimate,
            self.fraud_rate()
        )
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        info!("╔══════════════════════════════════════════════════╗");
        info!("║        FRAUD RISK DASHBOARD - STATISTICS         ║");
        info!("╠══════════════════════════════════════════════════╣");
        info!("║ Analyzed:   {:>8}                             ║", self.analyzed);
        info!("╠══════════════════════════════════════════════════╣");
        for level in [RiskLevel::Fraud, RiskLevel::Suspect, RiskLevel::Legitimate] {
            let count = self.count(level);
            let pct = if self.analyzed > 0 {
                (count as f64 / self.analyzed as f64) * 100.0
            } else {
                0.0
            };
            let bar: String = "█".repeat(((pct / 5.0) as usize).min(20));
            info!(
                "║ {} {:10}: {:>6} ({:>5.1}%) {}",
                level.glyph(),
                level.label(),
                count,
                pct,
                bar
            );
        }
        info!("╠══════════════════════════════════════════════════╣");
        info!("║ Fraud rate: {:>5.1}%                               ║", self.fraud_rate());
        info!("╚══════════════════════════════════════════════════╝");
    }
}
