//! Diagnostic analytics: the Engineering attrition case study

use super::charts::{histogram, histogram_in_range, ChartData, ChartSpec, HistogramGroup};
use crate::columns::{f64_values, i64_values, str_values};
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::schema::*;
use itertools::Itertools;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const REQUIRED: &[DerivedColumn] = &[
    DerivedColumn::TenureYears,
    DerivedColumn::EngagementScore,
    DerivedColumn::Attrition,
    DerivedColumn::Department,
];

pub const ENGAGEMENT_CHART: &str = "Engagement Score Distribution (Engineering vs. Others)";
pub const ATTRITION_TENURE_CHART: &str = "Tenure of Employees with Attrition (Engineering)";

const ENGAGEMENT_BINS: usize = 10;
const TENURE_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttritionRates {
    pub engineering_headcount: usize,
    pub engineering_attrited: usize,
    pub engineering_rate_pct: f64,
    pub overall_rate_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticAnalytics {
    pub rates: AttritionRates,
    pub charts: Vec<ChartSpec>,
    pub notes: Vec<String>,
}

struct Row {
    department: String,
    engagement: f64,
    attrition: bool,
    tenure_years: f64,
}

pub fn diagnose(table: &DataFrame, normalizer: &mut Normalizer) -> Result<DiagnosticAnalytics> {
    let table = normalizer.ensure_columns(table.clone(), REQUIRED)?;
    let rows = collect_rows(&table)?;

    let rates = attrition_rates(&rows);
    info!(
        "Engineering attrition {:.1}% vs overall {:.1}%",
        rates.engineering_rate_pct, rates.overall_rate_pct
    );

    let mut charts = vec![engagement_by_department(&rows)];
    let mut notes = Vec::new();

    let attrited_tenure: Vec<f64> = rows
        .iter()
        .filter(|r| r.department == ENGINEERING && r.attrition)
        .map(|r| r.tenure_years)
        .collect();
    if attrited_tenure.is_empty() {
        notes.push(
            "No attrition cases in Engineering department to plot tenure distribution."
                .to_string(),
        );
    } else {
        charts.push(ChartSpec::new(
            ATTRITION_TENURE_CHART,
            "Tenure (Years)",
            "Employees",
            ChartData::Histogram {
                bins: histogram(&attrited_tenure, TENURE_BINS),
            },
        ));
    }

    Ok(DiagnosticAnalytics {
        rates,
        charts,
        notes,
    })
}

fn collect_rows(table: &DataFrame) -> Result<Vec<Row>> {
    let departments = str_values(table, DEPARTMENT)?;
    let engagement = f64_values(table, ENGAGEMENT_SCORE)?;
    let attrition = i64_values(table, ATTRITION)?;
    let tenure = f64_values(table, TENURE_YEARS)?;

    let rows = departments
        .into_iter()
        .zip(engagement)
        .zip(attrition)
        .zip(tenure)
        .map(|(((department, engagement), attrition), tenure)| Row {
            department: department.unwrap_or_default(),
            engagement: engagement.unwrap_or_default(),
            attrition: attrition == Some(1),
            tenure_years: tenure.unwrap_or_default(),
        })
        .collect();
    Ok(rows)
}

fn attrition_rates(rows: &[Row]) -> AttritionRates {
    let engineering: Vec<&Row> = rows.iter().filter(|r| r.department == ENGINEERING).collect();
    let engineering_attrited = engineering.iter().filter(|r| r.attrition).count();
    let overall_attrited = rows.iter().filter(|r| r.attrition).count();

    AttritionRates {
        engineering_headcount: engineering.len(),
        engineering_attrited,
        engineering_rate_pct: percentage(engineering_attrited, engineering.len()),
        overall_rate_pct: percentage(overall_attrited, rows.len()),
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Per-department engagement histograms sharing one set of bin edges.
fn engagement_by_department(rows: &[Row]) -> ChartSpec {
    let groups = match rows.iter().map(|r| r.engagement).minmax().into_option() {
        Some((lo, hi)) => rows
            .iter()
            .map(|r| (r.department.clone(), r.engagement))
            .into_group_map()
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .map(|(group, values)| HistogramGroup {
                bins: histogram_in_range(&values, ENGAGEMENT_BINS, lo, hi),
                group,
            })
            .collect(),
        None => Vec::new(),
    };

    ChartSpec::new(
        ENGAGEMENT_CHART,
        "Engagement Score",
        "Employees",
        ChartData::GroupedHistogram { groups },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn normalizer() -> Normalizer {
        Normalizer::with_seed(NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(), 11)
    }

    #[test]
    fn test_attrition_rates() {
        let table = df!(
            "Department" => &["Engineering", "Engineering", "Engineering", "Engineering", "Sales"],
            "Attrition" => &[1i64, 0, 1, 0, 0],
            "EngagementScore" => &[50i64, 80, 45, 90, 70],
            "TenureYears" => &[1.0, 3.0, 2.0, 4.0, 5.0]
        )
        .unwrap();

        let result = diagnose(&table, &mut normalizer()).unwrap();
        assert_eq!(result.rates.engineering_headcount, 4);
        assert_eq!(result.rates.engineering_attrited, 2);
        assert_eq!(result.rates.engineering_rate_pct, 50.0);
        assert_eq!(result.rates.overall_rate_pct, 40.0);
        assert_eq!(result.charts.len(), 2);
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_no_engineering_attrition_adds_note() {
        let table = df!(
            "Department" => &["Sales", "HR"],
            "Attrition" => &[0i64, 1],
            "EngagementScore" => &[88i64, 61],
            "TenureYears" => &[1.5, 2.5]
        )
        .unwrap();

        let result = diagnose(&table, &mut normalizer()).unwrap();
        assert_eq!(result.rates.engineering_rate_pct, 0.0);
        assert_eq!(result.charts.len(), 1);
        assert_eq!(result.notes.len(), 1);
        match &result.charts[0].data {
            ChartData::GroupedHistogram { groups } => {
                let labels: Vec<&str> = groups.iter().map(|g| g.group.as_str()).collect();
                assert_eq!(labels, vec!["HR", "Sales"]);
            }
            other => panic!("unexpected chart data: {:?}", other),
        }
    }
}
