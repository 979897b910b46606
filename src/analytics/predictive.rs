//! Predictive analytics: attrition risk forecast

use super::charts::{Bar, ChartData, ChartSpec};
use crate::columns::{f64_values, has_column, str_values};
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::schema::*;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

pub const REQUIRED: &[DerivedColumn] = &[
    DerivedColumn::EngagementScore,
    DerivedColumn::TenureYears,
    DerivedColumn::Department,
    DerivedColumn::AttritionRiskScore,
];

pub const TOP_RISK_CHART: &str = "Top 10 Employees by Attrition Risk Score";

pub const TOP_RISK_ROWS: usize = 20;
pub const TOP_RISK_BARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub name: String,
    pub department: String,
    pub role: String,
    pub tenure_years: f64,
    pub engagement_score: f64,
    pub attrition_risk_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveAnalytics {
    /// Highest risk first
    pub top_risks: Vec<RiskEntry>,
    pub charts: Vec<ChartSpec>,
    pub notes: Vec<String>,
}

pub fn predict(table: &DataFrame, normalizer: &mut Normalizer) -> Result<PredictiveAnalytics> {
    let table = normalizer.ensure_columns(table.clone(), REQUIRED)?;

    let mut entries = risk_entries(&table)?;
    entries.sort_by(|a, b| b.attrition_risk_score.total_cmp(&a.attrition_risk_score));
    entries.truncate(TOP_RISK_ROWS);

    let mut charts = Vec::new();
    let mut notes = Vec::new();
    if entries.is_empty() {
        notes.push("No employees found to plot attrition risk.".to_string());
    } else {
        let bars = entries
            .iter()
            .take(TOP_RISK_BARS)
            .map(|e| Bar {
                label: e.name.clone(),
                value: e.attrition_risk_score,
            })
            .collect();
        charts.push(ChartSpec::new(
            TOP_RISK_CHART,
            "Employee Name",
            "Attrition Risk Score (%)",
            ChartData::Bar { bars },
        ));
    }

    Ok(PredictiveAnalytics {
        top_risks: entries,
        charts,
        notes,
    })
}

fn risk_entries(table: &DataFrame) -> Result<Vec<RiskEntry>> {
    let height = table.height();
    let optional_text = |name: &str| -> Result<Vec<Option<String>>> {
        if has_column(table, name) {
            str_values(table, name)
        } else {
            Ok(vec![None; height])
        }
    };

    let names = optional_text(NAME)?;
    let roles = optional_text(ROLE)?;
    let departments = str_values(table, DEPARTMENT)?;
    let tenure = f64_values(table, TENURE_YEARS)?;
    let engagement = f64_values(table, ENGAGEMENT_SCORE)?;
    let scores = f64_values(table, ATTRITION_RISK_SCORE)?;

    let entries = (0..height)
        .map(|i| RiskEntry {
            name: names[i].clone().unwrap_or_default(),
            department: departments[i].clone().unwrap_or_default(),
            role: roles[i].clone().unwrap_or_default(),
            tenure_years: tenure[i].unwrap_or_default(),
            engagement_score: engagement[i].unwrap_or_default(),
            attrition_risk_score: scores[i].unwrap_or_default(),
        })
        .collect();
    Ok(entries)
}
