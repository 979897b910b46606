//! CSV ingestion and export

use crate::error::{AnalyticsError, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Reads an employee CSV. Any failure is reported as `SourceUnavailable`.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(AnalyticsError::SourceUnavailable(format!(
            "CSV file not found at '{}'",
            path.display()
        )));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_try_parse_dates(true)
        .with_infer_schema_length(Some(1000))
        .finish()
        .map_err(|e| unreadable(path, e))?
        .collect()
        .map_err(|e| unreadable(path, e))?;

    info!(
        "Loaded {} rows, {} columns from '{}'",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Writes a table as CSV with a header row, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    info!("Wrote {} rows to '{}'", df.height(), path.display());
    Ok(())
}

fn unreadable(path: &Path, err: PolarsError) -> AnalyticsError {
    AnalyticsError::SourceUnavailable(format!(
        "Error reading CSV file '{}': {}",
        path.display(),
        err
    ))
}
