//! Analytics consumers
//!
//! Each consumer normalizes its own copy of the session table with the
//! columns it needs, then aggregates it into summaries and chart specs.

pub mod charts;
pub mod descriptive;
pub mod diagnostic;
pub mod predictive;

pub use charts::{ChartData, ChartSpec};
pub use descriptive::{describe, DescriptiveAnalytics, WorkforceKpis};
pub use diagnostic::{diagnose, AttritionRates, DiagnosticAnalytics};
pub use predictive::{predict, PredictiveAnalytics, RiskEntry};
