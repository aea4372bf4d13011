//! Synthetic transaction generation for the simulated feed

use crate::config::{AmountBand, FeedConfig};
use crate::types::transaction::Transaction;
use rand::Rng;

/// Draws random transactions from the configured magnitude bands.
///
/// Every simulated transaction is scored against the same fixed average
/// daily amount, whatever the feed has produced so far.
#[derive(Debug, Clone)]
pub struct TransactionGenerator {
    amount_bands: Vec<AmountBand>,
    avg_daily_amount: f64,
    foreign_probability: f64,
    high_risk_probability: f64,
    declined_probability: f64,
    max_refusals: u32,
}

impl TransactionGenerator {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            amount_bands: config.amount_bands.clone(),
            avg_daily_amount: config.simulated_avg_daily_amount,
            foreign_probability: config.foreign_probability,
            high_risk_probability: config.high_risk_probability,
            declined_probability: config.declined_probability,
            max_refusals: config.max_refusals,
        }
    }

    /// Generate a random transaction
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Transaction {
        Transaction {
            amount: self.random_amount(rng),
            avg_daily_amount: self.avg_daily_amount,
            is_foreign: rng.gen_bool(self.foreign_probability),
            is_high_risk_country: rng.gen_bool(self.high_risk_probability),
            is_declined: rng.gen_bool(self.declined_probability),
            refusals_today: rng.gen_range(0..=self.max_refusals),
        }
    }

    /// Pick a band uniformly, then a whole amount uniformly inside it
    fn random_amount<R: Rng>(&self, rng: &mut R) -> f64 {
        match self.amount_bands.len() {
            0 => 0.0,
            len => {
                let band = self.amount_bands[rng.gen_range(0..len)];
                f64::from(rng.gen_range(band.min..=band.max))
            }
        }
    }

    pub fn amount_bands(&self) -> &[AmountBand] {
        &self.amount_bands
    }
}

impl Default for TransactionGenerator {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}
