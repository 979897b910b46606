//! Descriptive analytics: workforce snapshot

use super::charts::{box_stats, histogram, value_counts, ChartData, ChartSpec};
use crate::columns::{column_mean, f64_values, has_column, str_values};
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::schema::*;
use itertools::Itertools;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const REQUIRED: &[DerivedColumn] = &[DerivedColumn::TenureYears];

pub const TENURE_CHART: &str = "Employee Tenure Distribution";
pub const SALARY_CHART: &str = "Salary Distribution by Department";
pub const GENDER_CHART: &str = "Workforce Gender Distribution";

const TENURE_BINS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceKpis {
    pub total_employees: usize,
    pub average_tenure_years: f64,
    pub average_salary: f64,
    pub average_engagement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptiveAnalytics {
    pub kpis: WorkforceKpis,
    pub charts: Vec<ChartSpec>,
    /// Charts that could not be built, with the reason
    pub skipped: Vec<String>,
}

pub fn describe(table: &DataFrame, normalizer: &mut Normalizer) -> Result<DescriptiveAnalytics> {
    let table = normalizer.ensure_columns(table.clone(), REQUIRED)?;

    let kpis = WorkforceKpis {
        total_employees: table.height(),
        average_tenure_years: column_mean(&table, TENURE_YEARS)?,
        average_salary: column_mean(&table, SALARY)?,
        average_engagement: column_mean(&table, ENGAGEMENT_SCORE)?,
    };

    let mut charts = Vec::new();
    let mut skipped = Vec::new();

    let tenure: Vec<f64> = f64_values(&table, TENURE_YEARS)?.into_iter().flatten().collect();
    charts.push(ChartSpec::new(
        TENURE_CHART,
        "Tenure (Years)",
        "Employees",
        ChartData::Histogram {
            bins: histogram(&tenure, TENURE_BINS),
        },
    ));

    if has_column(&table, SALARY) && has_column(&table, DEPARTMENT) {
        charts.push(salary_by_department(&table)?);
    } else {
        let reason = format!("{}: '{}' or '{}' column missing", SALARY_CHART, SALARY, DEPARTMENT);
        warn!("Cannot generate {}", reason);
        skipped.push(reason);
    }

    if has_column(&table, GENDER) {
        let genders = str_values(&table, GENDER)?;
        charts.push(ChartSpec::new(
            GENDER_CHART,
            "Gender",
            "Count",
            ChartData::Pie {
                slices: value_counts(genders.iter().flatten().map(String::as_str)),
            },
        ));
    } else {
        let reason = format!("{}: '{}' column missing", GENDER_CHART, GENDER);
        warn!("Cannot generate {}", reason);
        skipped.push(reason);
    }

    Ok(DescriptiveAnalytics {
        kpis,
        charts,
        skipped,
    })
}

fn salary_by_department(table: &DataFrame) -> Result<ChartSpec> {
    let departments = str_values(table, DEPARTMENT)?;
    let salaries = f64_values(table, SALARY)?;

    let groups = departments
        .into_iter()
        .zip(salaries)
        .filter_map(|(department, salary)| Some((department?, salary?)))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .filter_map(|(department, values)| box_stats(&department, &values))
        .collect();

    Ok(ChartSpec::new(
        SALARY_CHART,
        "Department",
        "Salary",
        ChartData::BoxPlot { groups },
    ))
}
