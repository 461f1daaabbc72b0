//! Hub metrics error types.
//!
//! Schema errors (`DuplicateMetric`, `LabelMismatch`, `KindMismatch`) are
//! programmer errors: they abort initialization or fail loudly in development
//! builds. `PersistenceQuery` is transient and only ever surfaces from a
//! collector cycle, which logs it and waits for the next tick.

use thiserror::Error;

/// Hub metrics error type.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Metric {name} is already defined with a different schema")]
    DuplicateMetric { name: String },

    #[error("Label mismatch for {name}: expected {expected:?}, got {actual:?}")]
    LabelMismatch {
        name: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Metric {name} is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Invalid metric definition for {name}: {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("Invalid histogram buckets: {0}")]
    InvalidBuckets(String),

    #[error("Persistence query failed: {0}")]
    PersistenceQuery(String),
}

impl MetricsError {
    /// Returns true for errors a periodic cycle may recover from on its next tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, MetricsError::PersistenceQuery(_))
    }
}

/// Convert sqlx errors to MetricsError
impl From<sqlx::Error> for MetricsError {
    fn from(err: sqlx::Error) -> Self {
        MetricsError::PersistenceQuery(err.to_string())
    }
}
