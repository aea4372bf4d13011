//! Risk score and risk level data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Legitimate,
    Suspect,
    Fraud,
}

impl RiskLevel {
    /// Determine risk level from score and thresholds
    pub fn from_score(score: f64, thresholds: &RiskLevelThresholds) -> Self {
        if score >= thresholds.fraud {
            RiskLevel::Fraud
        } else if score >= thresholds.suspect {
            RiskLevel::Suspect
        } else {
            RiskLevel::Legitimate
        }
    }

    /// Colored marker shown next to the level
    pub fn glyph(&self) -> &'static str {
        match self {
            RiskLevel::Legitimate => "🟢",
            RiskLevel::Suspect => "🟡",
            RiskLevel::Fraud => "🔴",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Legitimate => "LEGITIMATE",
            RiskLevel::Suspect => "SUSPECT",
            RiskLevel::Fraud => "FRAUD",
        }
    }

    /// Short status used in feed rows
    pub fn status_text(&self) -> &'static str {
        match self {
            RiskLevel::Legitimate => "OK",
            RiskLevel::Suspect => "SUSPECT",
            RiskLevel::Fraud => "FRAUD!",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score thresholds separating the risk levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelThresholds {
    /// Lowest score classified as suspect
    pub suspect: f64,
    /// Lowest score classified as fraud
    pub fraud: f64,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self {
            suspect: 40.0,
            fraud: 70.0,
        }
    }
}

/// Outcome of scoring a single transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Final risk score, clamped to 0 - 100
    pub score: f64,

    /// Risk level classification
    pub level: RiskLevel,

    /// Rule points before the random perturbation and clamping
    pub base_score: f64,

    /// Rules that contributed points
    pub triggered_rules: Vec<String>,
}

impl ScoreResult {
    /// Score as a fraction, for progress bars
    pub fn fraction(&self) -> f64 {
        self.score / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_score() {
        let thresholds = RiskLevelThresholds::default();

        assert_eq!(RiskLevel::from_score(0.0, &thresholds), RiskLevel::Legitimate);
        assert_eq!(RiskLevel::from_score(39.99, &thresholds), RiskLevel::Legitimate);
        assert_eq!(RiskLevel::from_score(40.0, &thresholds), RiskLevel::Suspect);
        assert_eq!(RiskLevel::from_score(69.99, &thresholds), RiskLevel::Suspect);
        assert_eq!(RiskLevel::from_score(70.0, &thresholds), RiskLevel::Fraud);
        assert_eq!(RiskLevel::from_score(100.0, &thresholds), RiskLevel::Fraud);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = RiskLevelThresholds {
            suspect: 20.0,
            fraud: 50.0,
        };

        assert_eq!(RiskLevel::from_score(25.0, &thresholds), RiskLevel::Suspect);
        assert_eq!(RiskLevel::from_score(55.0, &thresholds), RiskLevel::Fraud);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(RiskLevel::Fraud.to_string(), "FRAUD");
        assert_eq!(RiskLevel::Fraud.status_text(), "FRAUD!");
        assert_eq!(RiskLevel::Legitimate.status_text(), "OK");
        assert_eq!(RiskLevel::Suspect.glyph(), "🟡");
    }

    #[test]
    fn test_level_serializes_uppercase() {
        let json = serde_json::to_string(&RiskLevel::Suspect).unwrap();
        assert_eq!(json, "\"SUSPECT\"");
    }
}
