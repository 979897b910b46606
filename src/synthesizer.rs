//! Dataset Synthesizer - reproducible synthetic employee tables
//!
//! Draw order is part of the contract: for a fixed seed the generator must
//! consume the random stream in exactly this sequence, column by column.
//!
//! 1. Name (first index, then last index, per row)
//! 2. Department
//! 3. Role
//! 4. HireDate offset in days
//! 5. Salary (normal)
//! 6. PerformanceRating
//! 7. EngagementScore (base band)
//! 8. Attrition (base rate)
//! 9. Gender (weighted)
//! 10. Attrition re-draw for Engineering rows, in row order
//! 11. EngagementScore re-draw for attrited rows, in row order
//!
//! TenureYears is computed last from HireDate and consumes no draws.
//!
//! The generator is `rand::rngs::StdRng` (ChaCha12 in rand 0.8) seeded with
//! `seed_from_u64`.

use crate::error::{AnalyticsError, Result};
use crate::schema::*;
use chrono::{Duration, Local, NaiveDate};
use polars::prelude::*;
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::{debug, info};

pub const DEFAULT_ROW_COUNT: usize = 1000;

const SALARY_MEAN: f64 = 70_000.0;
const SALARY_STD_DEV: f64 = 20_000.0;

/// Synthesizes `row_count` employees, measuring tenure against the local date.
pub fn synthesize(seed: u64, row_count: usize) -> Result<DataFrame> {
    synthesize_as_of(seed, row_count, Local::now().date_naive())
}

/// Synthesizes `row_count` employees with tenure measured against `today`.
pub fn synthesize_as_of(seed: u64, row_count: usize, today: NaiveDate) -> Result<DataFrame> {
    if row_count == 0 {
        return Err(AnalyticsError::InvalidArgument(
            "row_count must be a positive integer".to_string(),
        ));
    }

    info!("Synthesizing {} employees (seed={})", row_count, seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = SyntheticColumns::with_capacity(row_count)?;
    rows.draw_base_columns(&mut rng, row_count)?;

    let engineering = rows.redraw_engineering_attrition(&mut rng);
    let attrited = rows.redraw_attrited_engagement(&mut rng);
    debug!(
        "Engineering rows re-drawn: {}, attrited rows re-drawn: {}",
        engineering, attrited
    );

    rows.compute_tenure(today);
    rows.into_dataframe()
}

/// Converts a signed row count from an outer surface (CLI, env) into a valid size.
pub fn row_count_from_signed(row_count: i64) -> Result<usize> {
    if row_count <= 0 {
        return Err(AnalyticsError::InvalidArgument(format!(
            "row_count must be a positive integer, got {}",
            row_count
        )));
    }
    usize::try_from(row_count).map_err(|_| {
        AnalyticsError::ResourceExhausted(format!("row_count {} does not fit in memory", row_count))
    })
}

fn reserve<T>(row_count: usize) -> Result<Vec<T>> {
    let mut values = Vec::new();
    values.try_reserve_exact(row_count).map_err(|e| {
        AnalyticsError::ResourceExhausted(format!(
            "cannot allocate {} rows: {}",
            row_count, e
        ))
    })?;
    Ok(values)
}

struct SyntheticColumns {
    employee_ids: Vec<i64>,
    names: Vec<String>,
    departments: Vec<&'static str>,
    roles: Vec<&'static str>,
    hire_dates: Vec<NaiveDate>,
    salaries: Vec<i64>,
    performance: Vec<i64>,
    engagement: Vec<i64>,
    attrition: Vec<i64>,
    genders: Vec<&'static str>,
    tenure: Vec<f64>,
}

impl SyntheticColumns {
    fn with_capacity(row_count: usize) -> Result<Self> {
        Ok(Self {
            employee_ids: reserve(row_count)?,
            names: reserve(row_count)?,
            departments: reserve(row_count)?,
            roles: reserve(row_count)?,
            hire_dates: reserve(row_count)?,
            salaries: reserve(row_count)?,
            performance: reserve(row_count)?,
            engagement: reserve(row_count)?,
            attrition: reserve(row_count)?,
            genders: reserve(row_count)?,
            tenure: reserve(row_count)?,
        })
    }

    fn draw_base_columns(&mut self, rng: &mut StdRng, row_count: usize) -> Result<()> {
        self.employee_ids.extend((1..=row_count).map(|id| id as i64));

        for _ in 0..row_count {
            let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            self.names.push(format!("{} {}", first, last));
        }

        for _ in 0..row_count {
            self.departments
                .push(DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())]);
        }

        for _ in 0..row_count {
            self.roles.push(ROLES[rng.gen_range(0..ROLES.len())]);
        }

        let window_start = hire_window_start();
        for _ in 0..row_count {
            let offset = rng.gen_range(0..HIRE_WINDOW_DAYS);
            self.hire_dates.push(window_start + Duration::days(offset));
        }

        let salary = Normal::new(SALARY_MEAN, SALARY_STD_DEV)
            .map_err(|e| AnalyticsError::InvalidArgument(format!("salary distribution: {}", e)))?;
        for _ in 0..row_count {
            // Truncation toward zero, no clamping.
            self.salaries.push(salary.sample(rng) as i64);
        }

        for _ in 0..row_count {
            self.performance.push(rng.gen_range(1..=5));
        }

        for _ in 0..row_count {
            self.engagement.push(rng.gen_range(60..100));
        }

        for _ in 0..row_count {
            self.attrition.push(rng.gen_bool(BASE_ATTRITION_RATE) as i64);
        }

        let gender = WeightedIndex::new(GENDER_WEIGHTS)
            .map_err(|e| AnalyticsError::InvalidArgument(format!("gender weights: {}", e)))?;
        for _ in 0..row_count {
            self.genders.push(GENDERS[gender.sample(rng)]);
        }

        Ok(())
    }

    /// Segment-specific overwrite: one fresh draw per Engineering row.
    fn redraw_engineering_attrition(&mut self, rng: &mut StdRng) -> usize {
        let mut redrawn = 0;
        for (department, attrition) in self.departments.iter().zip(self.attrition.iter_mut()) {
            if *department == ENGINEERING {
                *attrition = rng.gen_bool(ENGINEERING_ATTRITION_RATE) as i64;
                redrawn += 1;
            }
        }
        redrawn
    }

    /// Attrited employees get an engagement score from the low band.
    fn redraw_attrited_engagement(&mut self, rng: &mut StdRng) -> usize {
        let mut redrawn = 0;
        for (attrition, engagement) in self.attrition.iter().zip(self.engagement.iter_mut()) {
            if *attrition == 1 {
                *engagement = rng.gen_range(40..70);
                redrawn += 1;
            }
        }
        redrawn
    }

    fn compute_tenure(&mut self, today: NaiveDate) {
        self.tenure.extend(
            self.hire_dates
                .iter()
                .map(|hire_date| tenure_years(*hire_date, today)),
        );
    }

    fn into_dataframe(self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new(EMPLOYEE_ID, self.employee_ids),
            Series::new(NAME, self.names),
            Series::new(DEPARTMENT, self.departments),
            Series::new(ROLE, self.roles),
            Series::new(HIRE_DATE, self.hire_dates),
            Series::new(SALARY, self.salaries),
            Series::new(PERFORMANCE_RATING, self.performance),
            Series::new(ENGAGEMENT_SCORE, self.engagement),
            Series::new(ATTRITION, self.attrition),
            Series::new(GENDER, self.genders),
            Series::new(TENURE_YEARS, self.tenure),
        ])?;
        Ok(df)
    }
}
