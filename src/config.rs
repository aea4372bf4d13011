//! Configuration management for the fraud risk dashboard

use crate::types::score::RiskLevelThresholds;
use anyhow::{ensure, Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Risk scorer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Half-width of the uniform perturbation added to every score
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f64,
    /// Risk level classification thresholds
    #[serde(default)]
    pub risk_levels: RiskLevelThresholds,
}

fn default_noise_amplitude() -> f64 {
    5.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            noise_amplitude: default_noise_amplitude(),
            risk_levels: RiskLevelThresholds::default(),
        }
    }
}

/// Inclusive range of whole amounts a simulated transaction may draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AmountBand {
    pub min: u32,
    pub max: u32,
}

impl AmountBand {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Simulated feed configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Number of recent entries kept in history
    pub history_capacity: usize,
    /// Number of entries surfaced to the display
    pub visible_entries: usize,
    /// Id counter value after a reset; the first entry gets the next id
    pub initial_transaction_id: u64,
    /// Average daily amount assumed for every simulated transaction
    pub simulated_avg_daily_amount: f64,
    pub foreign_probability: f64,
    pub high_risk_probability: f64,
    pub declined_probability: f64,
    /// Upper bound (inclusive) of simulated refusals
    pub max_refusals: u32,
    /// Magnitude bands, one picked uniformly per transaction
    pub amount_bands: Vec<AmountBand>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            visible_entries: 5,
            initial_transaction_id: 220,
            simulated_avg_daily_amount: 200.0,
            foreign_probability: 0.3,
            high_risk_probability: 0.2,
            declined_probability: 0.1,
            max_refusals: 5,
            amount_bands: vec![
                AmountBand::new(10, 200),
                AmountBand::new(50, 500),
                AmountBand::new(100, 1000),
                AmountBand::new(500, 3000),
                AmountBand::new(2000, 15000),
            ],
        }
    }
}

/// Feed driver configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Interval between heartbeats in milliseconds
    pub tick_interval_ms: u64,
    /// Seed for the random source (entropy when absent)
    pub seed: Option<u64>,
    /// Start streaming as soon as the driver runs
    pub autostart: bool,
}

impl DriverConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            seed: None,
            autostart: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load `path` if given, else the default file when it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            }),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the types cannot express
    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        ensure!(
            scoring.noise_amplitude.is_finite() && scoring.noise_amplitude >= 0.0,
            "scoring.noise_amplitude must be non-negative"
        );
        ensure!(
            scoring.risk_levels.suspect >= 0.0,
            "scoring.risk_levels.suspect must be non-negative"
        );
        ensure!(
            scoring.risk_levels.fraud >= scoring.risk_levels.suspect,
            "scoring.risk_levels.fraud ({}) is below suspect ({})",
            scoring.risk_levels.fraud,
            scoring.risk_levels.suspect
        );

        let feed = &self.feed;
        ensure!(feed.history_capacity > 0, "feed.history_capacity must be positive");
        ensure!(
            feed.visible_entries <= feed.history_capacity,
            "feed.visible_entries ({}) exceeds history_capacity ({})",
            feed.visible_entries,
            feed.history_capacity
        );
        ensure!(
            feed.simulated_avg_daily_amount >= 0.0,
            "feed.simulated_avg_daily_amount must be non-negative"
        );
        for (name, p) in [
            ("foreign_probability", feed.foreign_probability),
            ("high_risk_probability", feed.high_risk_probability),
            ("declined_probability", feed.declined_probability),
        ] {
            ensure!((0.0..=1.0).contains(&p), "feed.{name} must be within [0, 1], got {p}");
        }
        ensure!(!feed.amount_bands.is_empty(), "feed.amount_bands must not be empty");
        for band in &feed.amount_bands {
            ensure!(
                band.min <= band.max,
                "amount band {}..={} is inverted",
                band.min,
                band.max
            );
        }

        ensure!(
            self.driver.tick_interval_ms > 0,
            "driver.tick_interval_ms must be positive"
        );
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            feed: FeedConfig::default(),
            driver: DriverConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scoring.noise_amplitude, 5.0);
        assert_eq!(config.scoring.risk_levels, RiskLevelThresholds::default());
        assert_eq!(config.feed.history_capacity, 10);
        assert_eq!(config.feed.visible_entries, 5);
        assert_eq!(config.feed.initial_transaction_id, 220);
        assert_eq!(config.feed.amount_bands.len(), 5);
        assert_eq!(config.driver.tick_interval(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[scoring]
noise_amplitude = 0.0

[feed]
history_capacity = 4
visible_entries = 2
initial_transaction_id = 1000
simulated_avg_daily_amount = 200.0
foreign_probability = 0.5
high_risk_probability = 0.5
declined_probability = 0.5
max_refusals = 2
amount_bands = [{{ min = 1, max = 10 }}]

[driver]
tick_interval_ms = 250
seed = 7
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.scoring.noise_amplitude, 0.0);
        assert_eq!(config.scoring.risk_levels.fraud, 70.0);
        assert_eq!(config.feed.history_capacity, 4);
        assert_eq!(config.feed.amount_bands, vec![AmountBand::new(1, 10)]);
        assert_eq!(config.driver.seed, Some(7));
        assert!(!config.driver.autostart);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[feed]\nhistory_capacity = 20\n\n[driver]\nseed = 3").unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.feed.history_capacity, 20);
        assert_eq!(config.feed.visible_entries, 5);
        assert_eq!(config.feed.initial_transaction_id, 220);
        assert_eq!(config.feed.amount_bands.len(), 5);
        assert_eq!(config.driver.seed, Some(3));
        assert_eq!(config.driver.tick_interval_ms, 2000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_or_default_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(AppConfig::load_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.scoring.noise_amplitude = -1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.feed.foreign_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.feed.visible_entries = 11;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.feed.amount_bands = vec![AmountBand::new(500, 100)];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scoring.risk_levels.fraud = 30.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.driver.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
