//! Weighted-rule risk scorer.
//!
//! Each rule adds a fixed number of points when it fires. The point total is
//! perturbed by a small uniform noise term and clamped to `[0, 100]` before
//! being mapped onto a [`RiskLevel`].

use crate::config::ScoringConfig;
use crate::types::score::{RiskLevel, RiskLevelThresholds, ScoreResult};
use crate::types::transaction::Transaction;
use rand::Rng;
use tracing::trace;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Amount-to-average ratio tiers, highest first: (ratio exceeded, points)
const RATIO_TIERS: [(f64, f64); 4] = [(25.0, 40.0), (10.0, 25.0), (5.0, 15.0), (3.0, 8.0)];

/// Absolute amount tiers, highest first: (amount exceeded, points)
const AMOUNT_TIERS: [(f64, f64); 3] = [(10_000.0, 25.0), (5_000.0, 15.0), (2_000.0, 8.0)];

/// Refusal count tiers, highest first: (minimum refusals, points)
const REFUSAL_TIERS: [(u32, f64); 3] = [(5, 20.0), (3, 12.0), (1, 5.0)];

const FOREIGN_POINTS: f64 = 10.0;
const HIGH_RISK_COUNTRY_POINTS: f64 = 20.0;
const DECLINED_POINTS: f64 = 5.0;

/// Source of the random perturbation applied to every score.
///
/// Every [`rand::Rng`] is a noise source; tests can supply a fixed value.
pub trait NoiseSource {
    /// Draw a value uniformly from `[-amplitude, amplitude]`.
    fn perturbation(&mut self, amplitude: f64) -> f64;
}

impl<R: Rng> NoiseSource for R {
    fn perturbation(&mut self, amplitude: f64) -> f64 {
        if amplitude > 0.0 {
            self.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }
}

/// Scores transactions with the fixed rule table
#[derive(Debug, Clone)]
pub struct RiskScorer {
    thresholds: RiskLevelThresholds,
    noise_amplitude: f64,
}

impl RiskScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self::with_thresholds(config.risk_levels.clone(), config.noise_amplitude)
    }

    /// `noise_amplitude` is expected non-negative, as `AppConfig::validate`
    /// enforces; anything else adds no noise.
    pub fn with_thresholds(thresholds: RiskLevelThresholds, noise_amplitude: f64) -> Self {
        Self {
            thresholds,
            noise_amplitude,
        }
    }

    pub fn thresholds(&self) -> &RiskLevelThresholds {
        &self.thresholds
    }

    pub fn noise_amplitude(&self) -> f64 {
        self.noise_amplitude
    }

    /// Score a transaction, drawing the perturbation from `noise`
    pub fn score<N: NoiseSource>(&self, tx: &Transaction, noise: &mut N) -> ScoreResult {
        let (base_score, triggered_rules) = Self::rule_points(tx);
        let perturbation = noise.perturbation(self.noise_amplitude);
        let score = (base_score + perturbation).clamp(MIN_SCORE, MAX_SCORE);
        let level = RiskLevel::from_score(score, &self.thresholds);

        trace!(base_score, perturbation, score, level = %level, "Transaction scored");

        ScoreResult {
            score,
            level,
            base_score,
            triggered_rules,
        }
    }

    /// Sum the points of every rule that fires, before noise and clamping
    pub fn rule_points(tx: &Transaction) -> (f64, Vec<String>) {
        let mut points = 0.0;
        let mut triggered = Vec::new();

        // No ratio term when the average is unknown
        if let Some(ratio) = tx.amount_ratio() {
            if let Some(&(limit, pts)) = RATIO_TIERS.iter().find(|(limit, _)| ratio > *limit) {
                points += pts;
                triggered.push(format!("amount_ratio>{limit}"));
            }
        }

        if let Some(&(limit, pts)) = AMOUNT_TIERS.iter().find(|(limit, _)| tx.amount > *limit) {
            points += pts;
            triggered.push(format!("amount>{limit}"));
        }

        if tx.is_foreign {
            points += FOREIGN_POINTS;
            triggered.push("foreign".to_string());
        }

        if tx.is_high_risk_country {
            points += HIGH_RISK_COUNTRY_POINTS;
            triggered.push("high_risk_country".to_string());
        }

        if tx.is_declined {
            points += DECLINED_POINTS;
            triggered.push("declined".to_string());
        }

        if let Some(&(min, pts)) = REFUSAL_TIERS
            .iter()
            .find(|(min, _)| tx.refusals_today >= *min)
        {
            points += pts;
            triggered.push(format!("refusals>={min}"));
        }

        (points, triggered)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
