//! Serializable pair-backtest configuration.
//!
//! A config file has three sections:
//!
//! ```toml
//! [pair]
//! symbol_a = "KO"
//! symbol_b = "PEP"
//! path_a = "data/KO.csv"
//! path_b = "data/PEP.csv"
//!
//! [strategy]
//! training_period = 252
//! entry_z = 2.0
//! exit_z = 1.0
//! with_intercept = false
//!
//! [portfolio]
//! initial_capital = 100000.0
//! leg_weight = 0.5
//! ```
//!
//! Only `[pair]` is required. Relative data paths resolve against the
//! directory that holds the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pairlab_core::accounting::TrainingPnlMode;
use pairlab_core::engine::config::{
    DEFAULT_INITIAL_CAPITAL, DEFAULT_LEG_WEIGHT, DEFAULT_TRAINING_PERIOD,
};
use pairlab_core::signal::{DEFAULT_ENTRY_THRESHOLD, DEFAULT_EXIT_THRESHOLD};
use pairlab_core::{BacktestError, EngineConfig};

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from reading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("pair symbols must be non-empty and distinct (got '{symbol_a}' and '{symbol_b}')")]
    InvalidPair { symbol_a: String, symbol_b: String },

    #[error(transparent)]
    Engine(#[from] BacktestError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Complete configuration for one pair backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacktestConfig {
    pub pair: PairConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
}

/// The two instruments and where their price histories live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairConfig {
    /// Dependent leg of the hedge regression.
    pub symbol_a: String,
    pub symbol_b: String,
    pub path_a: PathBuf,
    pub path_b: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    #[serde(default = "default_training_period")]
    pub training_period: usize,
    #[serde(default = "default_entry_z")]
    pub entry_z: f64,
    #[serde(default = "default_exit_z")]
    pub exit_z: f64,
    #[serde(default)]
    pub with_intercept: bool,
    #[serde(default)]
    pub training_pnl: TrainingPnlMode,
    #[serde(default)]
    pub min_test_period: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioConfig {
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default = "default_leg_weight")]
    pub leg_weight: f64,
}

fn default_training_period() -> usize {
    DEFAULT_TRAINING_PERIOD
}

fn default_entry_z() -> f64 {
    DEFAULT_ENTRY_THRESHOLD
}

fn default_exit_z() -> f64 {
    DEFAULT_EXIT_THRESHOLD
}

fn default_initial_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}

fn default_leg_weight() -> f64 {
    DEFAULT_LEG_WEIGHT
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            training_period: default_training_period(),
            entry_z: default_entry_z(),
            exit_z: default_exit_z(),
            with_intercept: false,
            training_pnl: TrainingPnlMode::default(),
            min_test_period: 0,
        }
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            leg_weight: default_leg_weight(),
        }
    }
}

/// Command-line overrides applied on top of a loaded config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub training_period: Option<usize>,
    pub entry_z: Option<f64>,
    pub exit_z: Option<f64>,
    pub with_intercept: Option<bool>,
    pub initial_capital: Option<f64>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl BacktestConfig {
    /// Parse a config from TOML text. Does not validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file and resolve relative data paths. Does not validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.pair.resolve_paths(base);
        }
        Ok(config)
    }

    /// Load a config file, merge CLI overrides on top, and validate the result.
    ///
    /// Only the merged config is validated, so an override may repair a value
    /// the file alone would be rejected for.
    pub fn load_with_overrides(
        path: &Path,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply CLI overrides in place. Call [`validate`](Self::validate) afterwards.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(n) = overrides.training_period {
            self.strategy.training_period = n;
        }
        if let Some(z) = overrides.entry_z {
            self.strategy.entry_z = z;
        }
        if let Some(z) = overrides.exit_z {
            self.strategy.exit_z = z;
        }
        if let Some(flag) = overrides.with_intercept {
            self.strategy.with_intercept = flag;
        }
        if let Some(capital) = overrides.initial_capital {
            self.portfolio.initial_capital = capital;
        }
    }

    /// Check every parameter before any data is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (a, b) = (self.pair.symbol_a.trim(), self.pair.symbol_b.trim());
        if a.is_empty() || b.is_empty() || a == b {
            return Err(ConfigError::InvalidPair {
                symbol_a: self.pair.symbol_a.clone(),
                symbol_b: self.pair.symbol_b.clone(),
            });
        }
        self.to_engine_config().validate()?;
        Ok(())
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            training_period: self.strategy.training_period,
            entry_zscore: self.strategy.entry_z,
            exit_zscore: self.strategy.exit_z,
            regression_has_intercept: self.strategy.with_intercept,
            leg_weight: self.portfolio.leg_weight,
            training_pnl: self.strategy.training_pnl,
            min_test_period: self.strategy.min_test_period,
            initial_capital: self.portfolio.initial_capital,
        }
    }

    /// Deterministic hash of this config together with the data it runs on.
    ///
    /// Two runs with identical configs over identical data share a RunId.
    pub fn run_id(&self, dataset_hash: &str) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(self)?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(json.as_bytes());
        hasher.update(dataset_hash.as_bytes());
        Ok(hasher.finalize().to_hex().to_string())
    }

    /// `A/B` label used in logs and reports.
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.pair.symbol_a, self.pair.symbol_b)
    }
}

impl PairConfig {
    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.path_a, &mut self.path_b] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[pair]
symbol_a = "KO"
symbol_b = "PEP"
path_a = "KO.csv"
path_b = "PEP.csv"
"#;

    #[test]
    fn minimal_config_takes_defaults() {
        let config = BacktestConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.strategy, StrategyConfig::default());
        assert_eq!(config.portfolio, PortfolioConfig::default());
        assert_eq!(config.to_engine_config(), EngineConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn full_config_parses() {
        let text = r#"
[pair]
symbol_a = "GLD"
symbol_b = "GDX"
path_a = "/data/GLD.csv"
path_b = "/data/GDX.csv"

[strategy]
training_period = 60
entry_z = 1.5
exit_z = 0.5
with_intercept = true
training_pnl = "portfolio_delta"
min_test_period = 20

[portfolio]
initial_capital = 50000.0
leg_weight = 0.25
"#;
        let config = BacktestConfig::from_toml(text).unwrap();
        let engine = config.to_engine_config();
        assert_eq!(engine.training_period, 60);
        assert_eq!(engine.entry_zscore, 1.5);
        assert_eq!(engine.exit_zscore, 0.5);
        assert!(engine.regression_has_intercept);
        assert_eq!(engine.training_pnl, TrainingPnlMode::PortfolioDelta);
        assert_eq!(engine.min_test_period, 20);
        assert_eq!(engine.initial_capital, 50_000.0);
        assert_eq!(engine.leg_weight, 0.25);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let text = format!("{MINIMAL}\n[strategy]\nentry_zz = 3.0\n");
        assert!(matches!(
            BacktestConfig::from_toml(&text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_pair_is_rejected() {
        assert!(BacktestConfig::from_toml("[strategy]\nentry_z = 2.0\n").is_err());
    }

    #[test]
    fn overrides_apply_on_top() {
        let mut config = BacktestConfig::from_toml(MINIMAL).unwrap();
        config.apply_overrides(&ConfigOverrides {
            training_period: Some(30),
            entry_z: Some(2.5),
            with_intercept: Some(true),
            ..Default::default()
        });
        assert_eq!(config.strategy.training_period, 30);
        assert_eq!(config.strategy.entry_z, 2.5);
        assert_eq!(config.strategy.exit_z, 1.0);
        assert!(config.strategy.with_intercept);
        assert!(ConfigOverrides::default().is_empty());
    }

    #[test]
    fn bad_overrides_fail_validation() {
        let mut config = BacktestConfig::from_toml(MINIMAL).unwrap();
        config.apply_overrides(&ConfigOverrides {
            exit_z: Some(3.0),
            ..Default::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Engine(BacktestError::InvalidThresholds { .. }))
        ));
    }

    #[test]
    fn identical_symbols_are_rejected() {
        let mut config = BacktestConfig::from_toml(MINIMAL).unwrap();
        config.pair.symbol_b = "KO".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPair { .. })
        ));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let mut config = BacktestConfig::from_toml(MINIMAL).unwrap();
        config.pair.path_b = PathBuf::from("/abs/PEP.csv");
        config.pair.resolve_paths(Path::new("/configs"));
        assert_eq!(config.pair.path_a, PathBuf::from("/configs/KO.csv"));
        assert_eq!(config.pair.path_b, PathBuf::from("/abs/PEP.csv"));
    }

    #[test]
    fn run_id_is_deterministic_and_sensitive() {
        let config = BacktestConfig::from_toml(MINIMAL).unwrap();
        let id1 = config.run_id("hash").unwrap();
        let id2 = config.run_id("hash").unwrap();
        assert_eq!(id1, id2, "RunId should be deterministic");
        assert_eq!(id1.len(), 64);

        assert_ne!(id1, config.run_id("other").unwrap());

        let mut changed = config.clone();
        changed.strategy.entry_z = 2.5;
        assert_ne!(id1, changed.run_id("hash").unwrap());
    }

    #[test]
    fn toml_roundtrip() {
        let config = BacktestConfig::from_toml(MINIMAL).unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(BacktestConfig::from_toml(&text).unwrap(), config);
    }
}
