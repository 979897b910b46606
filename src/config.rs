//! Application configuration
//!
//! Values come from the environment (a `.env` file is honoured) and can be
//! overridden by CLI flags.

use crate::error::{AnalyticsError, Result};
use crate::synthesizer::{row_count_from_signed, DEFAULT_ROW_COUNT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "Data/employee_data.csv";
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_DATA_PATH: &str = "HR_DATA_PATH";
pub const ENV_SEED: &str = "HR_SEED";
pub const ENV_ROW_COUNT: &str = "HR_ROW_COUNT";
pub const ENV_LOG: &str = "HR_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// CSV to load employee data from
    pub data_path: PathBuf,

    /// Seed for the synthetic fallback dataset
    pub seed: u64,

    /// Rows in the synthetic fallback dataset
    pub row_count: usize,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            seed: DEFAULT_SEED,
            row_count: DEFAULT_ROW_COUNT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment after reading `.env`.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(seed) = lookup(ENV_SEED) {
            config.seed = seed.trim().parse().map_err(|e| {
                AnalyticsError::Config(format!("{} must be an unsigned integer: {}", ENV_SEED, e))
            })?;
        }
        if let Some(rows) = lookup(ENV_ROW_COUNT) {
            let rows: i64 = rows.trim().parse().map_err(|e| {
                AnalyticsError::Config(format!("{} must be an integer: {}", ENV_ROW_COUNT, e))
            })?;
            config.row_count = row_count_from_signed(rows)?;
        }
        if let Some(level) = lookup(ENV_LOG) {
            config.log_level = level;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.row_count, 1000);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_PATH, "/tmp/people.csv"),
            (ENV_SEED, "7"),
            (ENV_ROW_COUNT, "250"),
        ]))
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/people.csv"));
        assert_eq!(config.seed, 7);
        assert_eq!(config.row_count, 250);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_SEED, "abc")])),
            Err(AnalyticsError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_ROW_COUNT, "-5")])),
            Err(AnalyticsError::InvalidArgument(_))
        ));
    }
}
