//! Error types for statistical routines.

use thiserror::Error;

/// Errors raised by a [`StatisticsBackend`](crate::StatisticsBackend).
#[derive(Debug, Error)]
pub enum StatsError {
    /// Column required by the design is missing from the long table.
    #[error("column '{column}' not found in long table")]
    ColumnNotFound { column: String },

    /// Dependent variable is not numeric.
    #[error("dependent variable '{column}' must be numeric, found {dtype}")]
    NonNumericDependent { column: String, dtype: String },

    /// A factor has fewer than two levels.
    #[error("factor '{factor}' needs at least 2 levels, found {found}")]
    TooFewLevels { factor: String, found: usize },

    /// Not enough subjects with complete data.
    #[error("need at least 2 subjects with complete data in {scope}, found {found}")]
    TooFewSubjects { scope: String, found: usize },

    /// A subject appears under more than one between-subjects level.
    #[error("subject '{subject}' belongs to more than one level of '{factor}'")]
    InconsistentGroup { subject: String, factor: String },

    /// A reference distribution rejected its parameters.
    #[error("invalid distribution parameters: {message}")]
    Distribution { message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Failure reported by an external backend implementation.
    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<polars::prelude::PolarsError> for StatsError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for statistical routines.
pub type Result<T> = std::result::Result<T, StatsError>;
