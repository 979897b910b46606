//! Derived-Metric Normalizer
//!
//! Guarantees that a table carries the derived columns a consumer asks for.
//! Presence-gated columns (tenure, engagement, attrition, department) are only
//! filled where absent or null. The attrition risk score is recomputed on every
//! call.
//!
//! TenureYears has two paths with different guarantees:
//! [`derive_tenure_from_hire_date`] is deterministic for a fixed "today", while
//! [`fill_random_tenure`] is a non-reproducible fallback used only when no hire
//! date is available.

use crate::columns::{
    date_values, f64_values, flag_values, has_fractional, has_column, i64_values, str_values,
    unreadable_cells,
};
use crate::error::Result;
use crate::risk::{RandomRiskScorer, RiskInputs, RiskScorer};
use crate::schema::*;
use chrono::{Local, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

const RANDOM_TENURE_MAX_YEARS: f64 = 10.0;

pub struct Normalizer {
    today: NaiveDate,
    rng: StdRng,
    scorer: Box<dyn RiskScorer>,
}

impl Normalizer {
    /// Normalizer with an entropy-seeded stream, measuring tenure against the local date.
    pub fn new() -> Self {
        Self::as_of(Local::now().date_naive())
    }

    pub fn as_of(today: NaiveDate) -> Self {
        Self {
            today,
            rng: StdRng::from_entropy(),
            scorer: Box::new(RandomRiskScorer),
        }
    }

    /// Normalizer with a fixed stream, for reproducible fills in tests.
    pub fn with_seed(today: NaiveDate, seed: u64) -> Self {
        Self {
            today,
            rng: StdRng::seed_from_u64(seed),
            scorer: Box::new(RandomRiskScorer),
        }
    }

    pub fn with_scorer(mut self, scorer: Box<dyn RiskScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Returns `table` with every column in `required` present and null-free.
    ///
    /// Missing prerequisites never fail: each column has a fallback fill.
    /// Errors only surface from the underlying frame operations.
    pub fn ensure_columns(
        &mut self,
        mut table: DataFrame,
        required: &[DerivedColumn],
    ) -> Result<DataFrame> {
        for column in resolve_order(required) {
            match column {
                DerivedColumn::TenureYears => self.ensure_tenure(&mut table)?,
                DerivedColumn::EngagementScore => self.ensure_engagement(&mut table)?,
                DerivedColumn::Attrition => self.ensure_attrition(&mut table)?,
                DerivedColumn::Department => self.ensure_department(&mut table)?,
                DerivedColumn::AttritionRiskScore => self.score_attrition_risk(&mut table)?,
            }
        }
        Ok(table)
    }

    fn ensure_tenure(&mut self, table: &mut DataFrame) -> Result<()> {
        let height = table.height();

        let derived = if has_column(table, TENURE_YEARS) {
            let existing = f64_values(table, TENURE_YEARS)?;
            if existing.iter().all(Option::is_some) {
                return cast_in_place(table, TENURE_YEARS, DataType::Float64);
            }
            let unreadable = unreadable_cells(table, TENURE_YEARS, &existing)?;
            if unreadable > 0 {
                warn!(
                    "{} {} cells are not finite numbers, re-deriving them",
                    unreadable, TENURE_YEARS
                );
            }
            // Nulls: derive from HireDate where possible.
            let from_hire = if has_column(table, HIRE_DATE) {
                self.tenure_from_hire_dates(table)?
            } else {
                vec![None; height]
            };
            existing
                .into_iter()
                .zip(from_hire)
                .map(|(current, derived)| current.or(derived))
                .collect()
        } else if has_column(table, HIRE_DATE) {
            debug!("Deriving {} from {}", TENURE_YEARS, HIRE_DATE);
            self.tenure_from_hire_dates(table)?
        } else {
            warn!(
                "{} absent, filling {} with random values",
                HIRE_DATE, TENURE_YEARS
            );
            vec![None; height]
        };

        let missing = derived.iter().filter(|v| v.is_none()).count();
        if missing > 0 && has_column(table, HIRE_DATE) {
            warn!(
                "{} rows without a usable {}, filling {} randomly",
                missing, HIRE_DATE, TENURE_YEARS
            );
        }
        let mut fallback = fill_random_tenure(&mut self.rng, missing).into_iter();
        let values: Vec<f64> = derived
            .into_iter()
            .map(|v| v.or_else(|| fallback.next()).unwrap_or_default())
            .collect();

        table.with_column(Series::new(TENURE_YEARS, values))?;
        Ok(())
    }

    fn tenure_from_hire_dates(&self, table: &DataFrame) -> Result<Vec<Option<f64>>> {
        let hire_dates = date_values(table, HIRE_DATE)?;
        let future = hire_dates.iter().flatten().filter(|d| **d > self.today).count();
        if future > 0 {
            warn!(
                "{} rows have a {} after {}, their {} is 0",
                future, HIRE_DATE, self.today, TENURE_YEARS
            );
        }
        Ok(derive_tenure_from_hire_date(&hire_dates, self.today))
    }

    /// Integer scores stay Int64; a column holding fractional scores keeps them as Float64.
    fn ensure_engagement(&mut self, table: &mut DataFrame) -> Result<()> {
        let rng = &mut self.rng;
        if has_column(table, ENGAGEMENT_SCORE)
            && has_fractional(&f64_values(table, ENGAGEMENT_SCORE)?)
        {
            fill_column(table, ENGAGEMENT_SCORE, f64_values, || {
                rng.gen_range(60i64..100) as f64
            })
        } else {
            fill_column(table, ENGAGEMENT_SCORE, i64_values, || rng.gen_range(60..100))
        }
    }

    fn ensure_attrition(&mut self, table: &mut DataFrame) -> Result<()> {
        let rng = &mut self.rng;
        fill_column(table, ATTRITION, flag_values, || {
            rng.gen_bool(BASE_ATTRITION_RATE) as i64
        })
    }

    fn ensure_department(&mut self, table: &mut DataFrame) -> Result<()> {
        let height = table.height();
        let existing = if has_column(table, DEPARTMENT) {
            let existing = str_values(table, DEPARTMENT)?;
            if existing.iter().all(Option::is_some) {
                return cast_in_place(table, DEPARTMENT, DataType::String);
            }
            existing
        } else {
            debug!("Filling {} with random departments", DEPARTMENT);
            vec![None; height]
        };

        let values: Vec<String> = existing
            .into_iter()
            .map(|v| {
                v.unwrap_or_else(|| {
                    DEPARTMENTS[self.rng.gen_range(0..DEPARTMENTS.len())].to_string()
                })
            })
            .collect();
        table.with_column(Series::new(DEPARTMENT, values))?;
        Ok(())
    }

    /// Always overwrites the score, whether or not the column exists.
    fn score_attrition_risk(&mut self, table: &mut DataFrame) -> Result<()> {
        let engagement: Vec<f64> = f64_values(table, ENGAGEMENT_SCORE)?
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        let tenure_years: Vec<f64> = f64_values(table, TENURE_YEARS)?
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        let departments: Vec<String> = str_values(table, DEPARTMENT)?
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();

        let inputs = RiskInputs {
            engagement: &engagement,
            tenure_years: &tenure_years,
            departments: &departments,
        };
        let scores = self.scorer.score(&inputs, &mut self.rng);
        debug!(
            "Scored attrition risk for {} rows with the {} scorer",
            scores.len(),
            self.scorer.name()
        );

        table.with_column(Series::new(ATTRITION_RISK_SCORE, scores))?;
        Ok(())
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic path: tenure from hire date, `None` where the date is unknown.
pub fn derive_tenure_from_hire_date(
    hire_dates: &[Option<NaiveDate>],
    today: NaiveDate,
) -> Vec<Option<f64>> {
    hire_dates
        .iter()
        .map(|d| d.map(|hire_date| tenure_years(hire_date, today)))
        .collect()
}

/// Non-deterministic fallback: uniform [0, 10) years rounded to one decimal.
pub fn fill_random_tenure<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<f64> {
    (0..count)
        .map(|_| (rng.gen::<f64>() * RANDOM_TENURE_MAX_YEARS * 10.0).round() / 10.0)
        .collect()
}

/// Prerequisites first, each column once, risk score last.
fn resolve_order(required: &[DerivedColumn]) -> Vec<DerivedColumn> {
    let mut ordered: Vec<DerivedColumn> = Vec::new();
    for column in required {
        for prerequisite in column.prerequisites() {
            if !ordered.contains(prerequisite) {
                ordered.push(*prerequisite);
            }
        }
        if !ordered.contains(column) {
            ordered.push(*column);
        }
    }
    ordered.sort_by_key(|c| matches!(c, DerivedColumn::AttritionRiskScore));
    ordered
}

/// Fills absent cells with `draw`. Readable values are kept; cells that hold a
/// value `read` cannot interpret are logged and then filled like nulls.
fn fill_column<T>(
    table: &mut DataFrame,
    name: &str,
    read: fn(&DataFrame, &str) -> Result<Vec<Option<T>>>,
    mut draw: impl FnMut() -> T,
) -> Result<()>
where
    T: Clone,
    Series: NamedFrom<Vec<T>, [T]>,
{
    let height = table.height();
    let present = has_column(table, name);
    let existing = if present {
        let existing = read(table, name)?;
        let unreadable = unreadable_cells(table, name, &existing)?;
        if unreadable > 0 {
            warn!(
                "{} {} cells could not be read, filling them randomly",
                unreadable, name
            );
        }
        existing
    } else {
        debug!("Filling {} with random values", name);
        vec![None; height]
    };

    let missing = existing.iter().filter(|v| v.is_none()).count();
    let values: Vec<T> = existing
        .into_iter()
        .map(|v| v.unwrap_or_else(&mut draw))
        .collect();
    let filled = Series::new(name, values);
    if present && missing == 0 && table.column(name)?.dtype() == filled.dtype() {
        return Ok(());
    }
    table.with_column(filled)?;
    Ok(())
}

fn cast_in_place(table: &mut DataFrame, name: &str, dtype: DataType) -> Result<()> {
    let series = table.column(name)?;
    if series.dtype() == &dtype {
        return Ok(());
    }
    let cast = series.cast(&dtype)?;
    table.with_column(cast)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
    }

    #[test]
    fn test_resolve_order_puts_prerequisites_first() {
        let order = resolve_order(&[DerivedColumn::AttritionRiskScore, DerivedColumn::Attrition]);
        assert_eq!(
            order,
            vec![
                DerivedColumn::EngagementScore,
                DerivedColumn::TenureYears,
                DerivedColumn::Department,
                DerivedColumn::Attrition,
                DerivedColumn::AttritionRiskScore,
            ]
        );
    }

    #[test]
    fn test_random_tenure_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let values = fill_random_tenure(&mut rng, 1000);
        assert!(values.iter().all(|v| (0.0..=10.0).contains(v)));
        assert!(values.iter().all(|v| ((v * 10.0).round() - v * 10.0).abs() < 1e-9));
    }

    #[test]
    fn test_derive_tenure_keeps_unknown_dates() {
        let dates = vec![NaiveDate::from_ymd_opt(2024, 7, 10), None];
        let derived = derive_tenure_from_hire_date(&dates, today());
        assert_eq!(derived[0], Some(365.0 / 365.25));
        assert_eq!(derived[1], None);
    }

    #[test]
    fn test_nulls_filled_in_present_column() {
        let df = df!(
            "EngagementScore" => &[Some(80i64), None, Some(75)]
        )
        .unwrap();
        let mut normalizer = Normalizer::with_seed(today(), 5);
        let out = normalizer
            .ensure_columns(df, &[DerivedColumn::EngagementScore])
            .unwrap();
        let values = i64_values(&out, ENGAGEMENT_SCORE).unwrap();
        assert_eq!(values[0], Some(80));
        assert_eq!(values[2], Some(75));
        assert!((60..100).contains(&values[1].unwrap()));
    }

    #[test]
    fn test_null_hire_date_falls_back_per_row() {
        let df = df!(
            "HireDate" => &[Some("2020-01-01"), None, Some("garbage")]
        )
        .unwrap();
        let mut normalizer = Normalizer::with_seed(today(), 5);
        let out = normalizer
            .ensure_columns(df, &[DerivedColumn::TenureYears])
            .unwrap();
        let tenure = f64_values(&out, TENURE_YEARS).unwrap();
        let hire = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(tenure[0], Some(tenure_years(hire, today())));
        assert!(tenure.iter().all(Option::is_some));
        assert!((0.0..=10.0).contains(&tenure[1].unwrap()));
    }
}
