//! Resolution of a [`ColumnSelector`] against a table's column list.

use std::collections::BTreeSet;

use rma_model::ColumnSelector;

use crate::error::{Result, TransformError};

/// Resolves a selector into an ordered, non-empty list of column names.
///
/// Pattern selectors keep every column whose name contains a match
/// (unanchored search) in table order. Explicit selectors keep the given
/// order and must name existing, distinct columns.
pub fn resolve_columns(available: &[String], selector: &ColumnSelector) -> Result<Vec<String>> {
    let resolved = match selector {
        ColumnSelector::Pattern(regex) => {
            let matched: Vec<String> = available
                .iter()
                .filter(|name| regex.is_match(name))
                .cloned()
                .collect();
            if matched.is_empty() {
                return Err(TransformError::NoMatchingColumns {
                    pattern: regex.as_str().to_string(),
                    available: available.to_vec(),
                });
            }
            matched
        }
        ColumnSelector::Explicit(columns) => {
            if columns.is_empty() {
                return Err(TransformError::EmptySelection);
            }
            let mut seen = BTreeSet::new();
            for column in columns {
                if !available.contains(column) {
                    return Err(TransformError::ColumnNotFound {
                        column: column.clone(),
                        available: available.to_vec(),
                    });
                }
                if !seen.insert(column.as_str()) {
                    return Err(TransformError::DuplicateColumn {
                        column: column.clone(),
                    });
                }
            }
            columns.clone()
        }
    };

    tracing::debug!(
        selector = %selector,
        resolved = resolved.len(),
        "Resolved repeated-measures columns"
    );
    Ok(resolved)
}
