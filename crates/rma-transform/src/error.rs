//! Error types for column resolution and reshaping.

use thiserror::Error;

/// Configuration and reshape errors, raised before any statistics run.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A `regex:` selector matched no column.
    #[error("no columns match pattern '{pattern}' (available: {})", .available.join(", "))]
    NoMatchingColumns {
        pattern: String,
        available: Vec<String>,
    },

    /// An explicit selector named no columns.
    #[error("repeated-measures column list is empty")]
    EmptySelection,

    /// A named column does not exist in the wide table.
    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// An explicit selector repeats a column.
    #[error("column '{column}' is selected more than once")]
    DuplicateColumn { column: String },

    /// Two roles would produce the same column name in the long table.
    #[error("column name '{column}' is used for both {first} and {second}")]
    ColumnConflict {
        column: String,
        first: &'static str,
        second: &'static str,
    },

    /// Repeated-measures columns hold values that cannot share one column.
    #[error("repeated-measures columns have incompatible types: {}", describe_types(.types))]
    IncompatibleMeasureTypes { types: Vec<(String, String)> },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

fn describe_types(types: &[(String, String)]) -> String {
    types
        .iter()
        .map(|(column, dtype)| format!("{column}: {dtype}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_lists_available_columns() {
        let err = TransformError::NoMatchingColumns {
            pattern: "^X".to_string(),
            available: vec!["ID".to_string(), "T1".to_string()],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"no columns match pattern '^X' (available: ID, T1)"
        );
    }

    #[test]
    fn test_incompatible_types_display() {
        let err = TransformError::IncompatibleMeasureTypes {
            types: vec![
                ("T1".to_string(), "i64".to_string()),
                ("T2".to_string(), "str".to_string()),
            ],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"repeated-measures columns have incompatible types: T1: i64, T2: str"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let err: TransformError = polars_err.into();
        assert!(matches!(err, TransformError::DataFrame { .. }));
    }
}
