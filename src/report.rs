//! Summary report
//!
//! Runs every analytics consumer in a fixed order and collects their text and
//! chart specs into one document. Rendering targets are Markdown (`Display`)
//! and JSON (`serde`).

use crate::analytics::{describe, diagnose, predict, AttritionRates, ChartSpec, RiskEntry};
use crate::error::Result;
use crate::normalizer::Normalizer;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

pub const REPORT_TITLE: &str = "HR Quarterly Review Report";

const EXECUTIVE_SUMMARY: &str = "This report provides an overview of key HR metrics and trends, \
covering workforce composition, employee engagement and attrition risk.";

const ENGINEERING_RECOMMENDATIONS: &[&str] = &[
    "Implement targeted retention programs for employees in their early career stages.",
    "Conduct deeper surveys to understand specific pain points affecting engagement in Engineering.",
    "Review workload and career development opportunities within the department.",
];

const PLANNING_NOTES: &[&str] = &[
    "Proactive Talent Retention: identify high-risk employees and intervene with targeted programs.",
    "Optimized Workforce Planning: anticipate staffing needs and address skill gaps early.",
    "Strategic Resource Allocation: align compensation and rewards with predicted risk.",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub body: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_risks: Vec<RiskEntry>,
    pub charts: Vec<ChartSpec>,
}

impl ReportSection {
    fn text(title: &str, body: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            body,
            top_risks: Vec::new(),
            charts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_on: NaiveDate,
    pub data_source: Option<String>,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn chart_titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.charts.iter().map(|c| c.title.as_str()))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds the full report over `table`. The table itself is not modified.
pub fn build_report(
    table: &DataFrame,
    normalizer: &mut Normalizer,
    data_source: Option<String>,
) -> Result<Report> {
    info!("Generating report over {} employees", table.height());

    let descriptive = describe(table, normalizer)?;
    let diagnostic = diagnose(table, normalizer)?;
    let predictive = predict(table, normalizer)?;

    let kpis = &descriptive.kpis;
    let mut sections = vec![
        ReportSection::text("Executive Summary", vec![EXECUTIVE_SUMMARY.to_string()]),
        ReportSection::text(
            "Workforce Overview",
            vec![
                format!("Total Employees: {}", group_thousands(kpis.total_employees as i64)),
                format!("Average Tenure: {:.1} years", kpis.average_tenure_years),
                format!("Average Salary: ${}", group_thousands(kpis.average_salary.round() as i64)),
                format!("Average Engagement Score: {:.1}", kpis.average_engagement),
            ],
        ),
    ];

    let mut descriptive_section = ReportSection::text("1. Descriptive Analytics", descriptive.skipped);
    descriptive_section.charts = descriptive.charts;
    sections.push(descriptive_section);

    let rates = &diagnostic.rates;
    let mut diagnostic_body = vec![
        attrition_headline(rates).to_string(),
        format!("Engineering Department Attrition Rate: {:.1}%", rates.engineering_rate_pct),
        format!("Overall Company Attrition Rate: {:.1}%", rates.overall_rate_pct),
    ];
    diagnostic_body.extend(diagnostic.notes);
    diagnostic_body.extend(
        ENGINEERING_RECOMMENDATIONS
            .iter()
            .map(|r| format!("Recommendation: {}", r)),
    );
    let mut diagnostic_section = ReportSection::text("2. Diagnostic Analytics", diagnostic_body);
    diagnostic_section.charts = diagnostic.charts;
    sections.push(diagnostic_section);

    let mut predictive_body = vec![format!(
        "Top {} Employees with Highest Attrition Risk (scored by the {} policy):",
        predictive.top_risks.len(),
        normalizer.scorer_name()
    )];
    predictive_body.extend(predictive.notes);
    predictive_body.extend(PLANNING_NOTES.iter().map(|n| n.to_string()));
    let mut predictive_section = ReportSection::text("3. Predictive Analytics", predictive_body);
    predictive_section.top_risks = predictive.top_risks;
    predictive_section.charts = predictive.charts;
    sections.push(predictive_section);

    sections.push(ReportSection::text(
        "Conclusion",
        vec!["This report was generated automatically from the current employee dataset.".to_string()],
    ));

    Ok(Report {
        title: REPORT_TITLE.to_string(),
        generated_on: normalizer.today(),
        data_source,
        sections,
    })
}

fn attrition_headline(rates: &AttritionRates) -> &'static str {
    if rates.engineering_rate_pct > rates.overall_rate_pct {
        "The Engineering department shows a significantly higher attrition rate."
    } else {
        "The Engineering department's attrition rate is not above the company average."
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f)?;
        writeln!(f, "Generated on {}", self.generated_on)?;
        if let Some(source) = &self.data_source {
            writeln!(f, "Data source: {}", source)?;
        }

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "## {}", section.title)?;
            writeln!(f)?;
            for line in &section.body {
                writeln!(f, "* {}", line)?;
            }

            if !section.top_risks.is_empty() {
                writeln!(f)?;
                writeln!(f, "| Name | Department | Role | Tenure (Years) | Engagement | Risk Score |")?;
                writeln!(f, "|---|---|---|---|---|---|")?;
                for entry in &section.top_risks {
                    writeln!(
                        f,
                        "| {} | {} | {} | {:.1} | {} | {:.1} |",
                        entry.name,
                        entry.department,
                        entry.role,
                        entry.tenure_years,
                        entry.engagement_score,
                        entry.attrition_risk_score
                    )?;
                }
            }

            for chart in &section.charts {
                writeln!(f)?;
                writeln!(f, "### {}", chart.title)?;
                writeln!(f, "{}", chart.summary())?;
            }
        }
        Ok(())
    }
}
