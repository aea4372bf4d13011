//! Transaction data structures for rule-based fraud scoring

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// A payment transaction submitted for risk scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction amount
    pub amount: f64,

    /// Customer's average daily spend (zero when unknown)
    #[serde(alias = "avg_amount", default)]
    pub avg_daily_amount: f64,

    /// Transaction originates abroad
    #[serde(default)]
    pub is_foreign: bool,

    /// Counterparty is located in a high-risk country
    #[serde(default)]
    pub is_high_risk_country: bool,

    /// Transaction was declined
    #[serde(default)]
    pub is_declined: bool,

    /// Number of refused transactions for this card today
    #[serde(default)]
    pub refusals_today: u32,
}

impl Transaction {
    /// Create a transaction with all risk flags cleared
    pub fn new(amount: f64, avg_daily_amount: f64) -> Self {
        Self {
            amount,
            avg_daily_amount,
            is_foreign: false,
            is_high_risk_country: false,
            is_declined: false,
            refusals_today: 0,
        }
    }

    pub fn foreign(mut self, is_foreign: bool) -> Self {
        self.is_foreign = is_foreign;
        self
    }

    pub fn high_risk_country(mut self, is_high_risk_country: bool) -> Self {
        self.is_high_risk_country = is_high_risk_country;
        self
    }

    pub fn declined(mut self, is_declined: bool) -> Self {
        self.is_declined = is_declined;
        self
    }

    pub fn refusals(mut self, refusals_today: u32) -> Self {
        self.refusals_today = refusals_today;
        self
    }

    /// Ratio of the amount to the average daily spend, if an average is known
    pub fn amount_ratio(&self) -> Option<f64> {
        (self.avg_daily_amount > 0.0).then(|| self.amount / self.avg_daily_amount)
    }

    /// Reject inputs outside the scorer's domain.
    ///
    /// The scorer itself never fails; callers accepting user input run this
    /// first.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.amount.is_finite() && self.amount >= 0.0,
            "amount must be a non-negative number, got {}",
            self.amount
        );
        ensure!(
            self.avg_daily_amount.is_finite() && self.avg_daily_amount >= 0.0,
            "average daily amount must be a non-negative number, got {}",
            self.avg_daily_amount
        );
        Ok(())
    }
}
