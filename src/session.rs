//! Session context
//!
//! Holds the one current employee table. The table is created on first access
//! and only ever replaced wholesale; consumers receive it by reference and
//! normalize their own copy.

use crate::config::AppConfig;
use crate::error::{AnalyticsError, Result};
use crate::ingestion::load_csv;
use crate::synthesizer::synthesize;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where the current table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableSource {
    Csv(PathBuf),
    Synthesized { seed: u64, row_count: usize },
    Provided,
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Csv(path) => write!(f, "CSV file '{}'", path.display()),
            TableSource::Synthesized { seed, row_count } => {
                write!(f, "simulated data ({} employees, seed {})", row_count, seed)
            }
            TableSource::Provided => f.write_str("provided table"),
        }
    }
}

pub struct Session {
    config: AppConfig,
    table: Option<DataFrame>,
    source: Option<TableSource>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            table: None,
            source: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&TableSource> {
        self.source.as_ref()
    }

    /// The current table, loading it on first access.
    pub fn current_table(&mut self) -> Result<&DataFrame> {
        if self.table.is_none() {
            self.reload()?;
        }
        self.table
            .as_ref()
            .ok_or_else(|| AnalyticsError::SourceUnavailable("no table loaded".to_string()))
    }

    /// Re-reads the configured source and replaces the current table.
    pub fn reload(&mut self) -> Result<&DataFrame> {
        let (table, source) = self.load()?;
        self.replace_table(table, source);
        self.table
            .as_ref()
            .ok_or_else(|| AnalyticsError::SourceUnavailable("no table loaded".to_string()))
    }

    /// Last write wins; the previous table is dropped.
    pub fn replace_table(&mut self, table: DataFrame, source: TableSource) {
        info!("Session table replaced: {} rows from {}", table.height(), source);
        self.table = Some(table);
        self.source = Some(source);
    }

    fn load(&self) -> Result<(DataFrame, TableSource)> {
        match load_csv(&self.config.data_path) {
            Ok(table) => Ok((table, TableSource::Csv(self.config.data_path.clone()))),
            Err(AnalyticsError::SourceUnavailable(reason)) => {
                warn!("{}; falling back to simulated employee data", reason);
                let table = synthesize(self.config.seed, self.config.row_count)?;
                Ok((
                    table,
                    TableSource::Synthesized {
                        seed: self.config.seed,
                        row_count: self.config.row_count,
                    },
                ))
            }
            Err(e) => Err(e),
        }
    }
}
