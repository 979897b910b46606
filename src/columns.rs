//! Typed column access over polars DataFrames.
//!
//! Every accessor casts to the canonical dtype first, so CSV-loaded columns
//! (often inferred as strings or a different integer width) read the same as
//! synthesized ones. Cells that do not survive the cast come back as `None`,
//! and so do non-finite floats.

use crate::error::Result;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| *c == name)
}

pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = df.column(name)?.cast(&DataType::Int64)?;
    let values = series.i64()?.into_iter().collect();
    Ok(values)
}

pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

/// Reads a 0/1 flag column. Text cells may also spell the flag as yes/no or true/false.
pub fn flag_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = df.column(name)?;
    if series.dtype() != &DataType::String {
        return i64_values(df, name);
    }
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_flag))
        .collect();
    Ok(values)
}

pub fn parse_flag(raw: &str) -> Option<i64> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "y" | "true" | "t" => Some(1),
        "0" | "no" | "n" | "false" | "f" => Some(0),
        _ => None,
    }
}

/// Cells holding a value in the raw column that did not survive a typed read.
pub fn unreadable_cells<T>(df: &DataFrame, name: &str, parsed: &[Option<T>]) -> Result<usize> {
    let raw = df.column(name)?;
    let present = raw.len() - raw.null_count();
    let readable = parsed.iter().filter(|v| v.is_some()).count();
    Ok(present.saturating_sub(readable))
}

pub fn has_fractional(values: &[Option<f64>]) -> bool {
    values.iter().flatten().any(|v| v.fract() != 0.0)
}

pub fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Reads a date column that may be stored as Date, Datetime or text.
pub fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let series = df.column(name)?;
    let values = match series.dtype() {
        DataType::Date => series.date()?.as_date_iter().collect(),
        DataType::Datetime(_, _) => {
            let dates = series.cast(&DataType::Date)?;
            let values = dates.date()?.as_date_iter().collect();
            values
        }
        _ => {
            let text = series.cast(&DataType::String)?;
            let values = text
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_date))
                .collect();
            values
        }
    };
    Ok(values)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Mean over the non-null cells, 0.0 for an empty column.
pub fn mean(values: &[Option<f64>]) -> f64 {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        0.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    }
}

/// Mean of a column if it exists, 0.0 otherwise.
pub fn column_mean(df: &DataFrame, name: &str) -> Result<f64> {
    if !has_column(df, name) {
        return Ok(0.0);
    }
    Ok(mean(&f64_values(df, name)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 3, 7);
        assert_eq!(parse_date("2019-03-07"), expected);
        assert_eq!(parse_date("2019/03/07"), expected);
        assert_eq!(parse_date("03/07/2019"), expected);
        assert_eq!(parse_date(" 2019-03-07 10:15:00 "), expected);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_typed_access_casts() {
        let df = df!(
            "score" => &["61", "x", "99"],
            "flag" => &[0i32, 1, 0]
        )
        .unwrap();

        assert_eq!(i64_values(&df, "score").unwrap(), vec![Some(61), None, Some(99)]);
        assert_eq!(i64_values(&df, "flag").unwrap(), vec![Some(0), Some(1), Some(0)]);
        assert!(has_column(&df, "flag"));
        assert!(!has_column(&df, "Flag"));
    }

    #[test]
    fn test_non_finite_floats_read_as_missing() {
        let df = df!("tenure" => &[f64::NAN, 3.0, f64::INFINITY]).unwrap();
        let values = f64_values(&df, "tenure").unwrap();
        assert_eq!(values, vec![None, Some(3.0), None]);
        assert_eq!(unreadable_cells(&df, "tenure", &values).unwrap(), 2);
    }

    #[test]
    fn test_flag_spellings() {
        let df = df!(
            "text" => &[Some("Yes"), Some(" no "), Some("TRUE"), Some("f"), Some("maybe"), None],
            "bools" => &[true, false, true, false, true, false]
        )
        .unwrap();

        let text = flag_values(&df, "text").unwrap();
        assert_eq!(text, vec![Some(1), Some(0), Some(1), Some(0), None, None]);
        assert_eq!(unreadable_cells(&df, "text", &text).unwrap(), 1);
        assert_eq!(
            flag_values(&df, "bools").unwrap(),
            vec![Some(1), Some(0), Some(1), Some(0), Some(1), Some(0)]
        );
    }

    #[test]
    fn test_mean_ignores_nulls() {
        assert_eq!(mean(&[Some(1.0), None, Some(3.0)]), 2.0);
        assert_eq!(mean(&[]), 0.0);
    }
}
