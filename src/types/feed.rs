//! Simulated feed entries

use crate::types::score::RiskLevel;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scored transaction from the simulated live feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Wall-clock time of day the entry was generated
    pub timestamp: NaiveTime,

    /// Sequential transaction identifier
    pub id: u64,

    /// Transaction amount
    pub amount: f64,

    /// Risk level assigned by the scorer
    pub level: RiskLevel,

    /// Display marker for the level
    pub glyph: String,

    /// Final risk score
    pub score: f64,
}

impl FeedEntry {
    pub fn new(timestamp: NaiveTime, id: u64, amount: f64, level: RiskLevel, score: f64) -> Self {
        Self {
            timestamp,
            id,
            amount,
            level,
            glyph: level.glyph().to_string(),
            score,
        }
    }
}

impl fmt::Display for FeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  #{}  ${:>8}  {} {}",
            self.timestamp.format("%H:%M:%S"),
            self.id,
            format_amount(self.amount, 0),
            self.glyph,
            self.level.status_text()
        )
    }
}

/// Format an amount with thousands separators, e.g. `12,345.60`
pub fn format_amount(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if amount.is_sign_negative() && amount != 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0, 0), "0");
        assert_eq!(format_amount(999.0, 0), "999");
        assert_eq!(format_amount(12345.0, 0), "12,345");
        assert_eq!(format_amount(1_000_000.0, 0), "1,000,000");
        assert_eq!(format_amount(1234.5, 2), "1,234.50");
        assert_eq!(format_amount(-2500.0, 0), "-2,500");
    }

    #[test]
    fn test_feed_entry_display() {
        let time = NaiveTime::from_hms_opt(14, 3, 9).unwrap();
        let entry = FeedEntry::new(time, 221, 12500.0, RiskLevel::Fraud, 88.0);

        let line = entry.to_string();
        assert!(line.starts_with("14:03:09  #221"));
        assert!(line.contains("12,500"));
        assert!(line.ends_with("🔴 FRAUD!"));
    }

    #[test]
    fn test_glyph_follows_level() {
        let time = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        let entry = FeedEntry::new(time, 1, 10.0, RiskLevel::Legitimate, 2.0);
        assert_eq!(entry.glyph, "🟢");
    }
}
