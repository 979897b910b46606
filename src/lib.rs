pub mod analytics;
pub mod columns;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod normalizer;
pub mod observability;
pub mod report;
pub mod risk;
pub mod schema;
pub mod session;
pub mod synthesizer;

pub use error::{AnalyticsError, Result};
pub use normalizer::Normalizer;
pub use schema::DerivedColumn;
pub use session::{Session, TableSource};
pub use synthesizer::{synthesize, synthesize_as_of};
