//! Engine configuration.
//!
//! Settings come from an optional JSON file, then environment overrides:
//!
//! - `PORTFOLIO_ANALYTICS_CONFIG`: path of the config file
//! - `PORTFOLIO_ANALYTICS_DATA_FILE`: dataset consumed by the JSON store
//! - `PORTFOLIO_ANALYTICS_RISK_FREE_RATE`: annual risk-free rate, in percent

use crate::timeframe::TimeframePreset;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_ENV: &str = "PORTFOLIO_ANALYTICS_CONFIG";
pub const DATA_FILE_ENV: &str = "PORTFOLIO_ANALYTICS_DATA_FILE";
pub const RISK_FREE_RATE_ENV: &str = "PORTFOLIO_ANALYTICS_RISK_FREE_RATE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Annual risk-free rate in percent, used for Sharpe and Sortino
    pub risk_free_rate: f64,
    /// Dataset file; falls back to [`AnalyticsConfig::default_data_file`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Window used when none is requested
    pub default_timeframe: TimeframePreset,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            data_file: None,
            default_timeframe: TimeframePreset::All,
        }
    }
}

impl AnalyticsConfig {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let config = if path.exists() {
            Self::from_path(&path)?
        } else {
            Self::default()
        };
        config.with_env_overrides()
    }

    /// Read a config from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded analytics config from {}", path.display());
        Ok(config)
    }

    /// Config file location.
    ///
    /// Default path: `<config dir>/portfolio-analytics/config.json`.
    /// Can be overridden with `PORTFOLIO_ANALYTICS_CONFIG`.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_FILE_ENV) {
            return PathBuf::from(path);
        }

        directories::ProjectDirs::from("", "", "portfolio-analytics")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("portfolio-analytics.json"))
    }

    /// Dataset location when the config does not name one.
    pub fn default_data_file() -> PathBuf {
        directories::ProjectDirs::from("", "", "portfolio-analytics")
            .map(|dirs| dirs.data_dir().join("portfolio.json"))
            .unwrap_or_else(|| PathBuf::from("portfolio.json"))
    }

    /// The dataset file this config points at.
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(Self::default_data_file)
    }

    /// Apply `PORTFOLIO_ANALYTICS_DATA_FILE` and `PORTFOLIO_ANALYTICS_RISK_FREE_RATE`.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(env::var(DATA_FILE_ENV).ok(), env::var(RISK_FREE_RATE_ENV).ok())
    }

    fn with_overrides(mut self, data_file: Option<String>, risk_free_rate: Option<String>) -> Result<Self> {
        if let Some(path) = data_file.filter(|p| !p.trim().is_empty()) {
            self.data_file = Some(PathBuf::from(path));
        }

        if let Some(raw) = risk_free_rate {
            self.risk_free_rate = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{} is not a number: {:?}", RISK_FREE_RATE_ENV, raw))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Replace the risk-free rate, rejecting non-finite values.
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Result<Self> {
        self.risk_free_rate = risk_free_rate;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }
}
