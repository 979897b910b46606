//! Employee table schema
//!
//! Column names and the closed categorical sets shared by the synthesizer,
//! the normalizer and the analytics consumers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EMPLOYEE_ID: &str = "EmployeeID";
pub const NAME: &str = "Name";
pub const DEPARTMENT: &str = "Department";
pub const ROLE: &str = "Role";
pub const HIRE_DATE: &str = "HireDate";
pub const SALARY: &str = "Salary";
pub const PERFORMANCE_RATING: &str = "PerformanceRating";
pub const ENGAGEMENT_SCORE: &str = "EngagementScore";
pub const ATTRITION: &str = "Attrition";
pub const GENDER: &str = "Gender";
pub const TENURE_YEARS: &str = "TenureYears";
pub const ATTRITION_RISK_SCORE: &str = "AttritionRiskScore";

pub const ENGINEERING: &str = "Engineering";

pub const DEPARTMENTS: [&str; 6] = [
    ENGINEERING,
    "Sales",
    "Marketing",
    "HR",
    "Finance",
    "Operations",
];

pub const ROLES: [&str; 5] = [
    "Manager",
    "Senior Associate",
    "Associate",
    "Analyst",
    "Specialist",
];

pub const GENDERS: [&str; 3] = ["Male", "Female", "Non-binary"];
pub const GENDER_WEIGHTS: [f64; 3] = [0.48, 0.48, 0.04];

pub const FIRST_NAMES: [&str; 20] = [
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Heidi", "Ivan", "Judy",
    "Kevin", "Linda", "Mike", "Nancy", "Oscar", "Pamela", "Quinn", "Rachel", "Steve", "Tina",
];

pub const LAST_NAMES: [&str; 20] = [
    "Smith", "Jones", "Williams", "Brown", "Davis", "Miller", "Wilson", "Moore", "Taylor",
    "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia",
    "Martinez", "Robinson", "Clark",
];

/// Days in the hire-date sampling window (7 years).
pub const HIRE_WINDOW_DAYS: i64 = 365 * 7;

pub const DAYS_PER_YEAR: f64 = 365.25;

/// Base attrition rate for every employee.
pub const BASE_ATTRITION_RATE: f64 = 0.1;

/// Attrition rate re-drawn for the Engineering segment.
pub const ENGINEERING_ATTRITION_RATE: f64 = 0.3;

/// First day of the hire-date sampling window.
pub fn hire_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default()
}

/// Tenure in years between a hire date and "today". Hire dates after today count as 0.
pub fn tenure_years(hire_date: NaiveDate, today: NaiveDate) -> f64 {
    ((today - hire_date).num_days() as f64 / DAYS_PER_YEAR).max(0.0)
}

/// Columns the normalizer knows how to guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivedColumn {
    TenureYears,
    EngagementScore,
    Attrition,
    Department,
    AttritionRiskScore,
}

impl DerivedColumn {
    pub fn name(&self) -> &'static str {
        match self {
            DerivedColumn::TenureYears => TENURE_YEARS,
            DerivedColumn::EngagementScore => ENGAGEMENT_SCORE,
            DerivedColumn::Attrition => ATTRITION,
            DerivedColumn::Department => DEPARTMENT,
            DerivedColumn::AttritionRiskScore => ATTRITION_RISK_SCORE,
        }
    }

    /// Columns that must exist before this one can be computed.
    pub fn prerequisites(&self) -> &'static [DerivedColumn] {
        match self {
            DerivedColumn::AttritionRiskScore => &[
                DerivedColumn::EngagementScore,
                DerivedColumn::TenureYears,
                DerivedColumn::Department,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for DerivedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
