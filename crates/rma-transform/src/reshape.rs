//! Projection and wide-to-long ("melt") reshaping.
//!
//! The long table has one row per (wide row, repeated-measures column) pair.
//! Rows are ordered within-major: every wide row for the first measure, then
//! every wide row for the second, and so on. Column order is
//! `[id, within, dv]` followed by the between-subjects column when present.

use polars::prelude::{Column, DataFrame, DataType, NamedFrom};

use rma_common::column_names;
use rma_model::{AnalysisRequest, ColumnSelector};

use crate::error::{Result, TransformError};
use crate::resolve::resolve_columns;

/// Column roles for one reshape.
#[derive(Debug, Clone, Copy)]
pub struct ReshapeSpec<'a> {
    /// Subject identifier column, carried through verbatim.
    pub id_col: &'a str,
    /// Repeated-measures columns of the wide table.
    pub within: &'a ColumnSelector,
    /// Name of the new within-factor (label) column.
    pub within_name: &'a str,
    /// Name of the new dependent-variable (value) column.
    pub dv_name: &'a str,
    /// Optional between-subjects column, carried through verbatim.
    pub between_col: Option<&'a str>,
}

impl<'a> ReshapeSpec<'a> {
    pub fn from_request(request: &'a AnalysisRequest) -> Self {
        Self {
            id_col: &request.id_col,
            within: &request.within_cols,
            within_name: &request.within_name,
            dv_name: &request.dv_name,
            between_col: request.between_col.as_deref(),
        }
    }
}

/// A long-format table together with the measures it was built from.
#[derive(Debug, Clone)]
pub struct LongFrame {
    /// The reshaped data.
    pub data: DataFrame,
    /// Resolved repeated-measures columns, in within-level order.
    pub measure_columns: Vec<String>,
}

/// Resolves, projects and melts a wide table into long format.
///
/// Values pass through unchanged, nulls included; no rows are filtered.
pub fn reshape_to_long(wide: &DataFrame, spec: &ReshapeSpec<'_>) -> Result<LongFrame> {
    let available = column_names(wide);
    require_column(&available, spec.id_col)?;
    if let Some(between) = spec.between_col {
        require_column(&available, between)?;
    }

    let measures = resolve_columns(&available, spec.within)?;
    check_conflicts(spec, &measures)?;

    let projected = project_columns(wide, spec.id_col, &measures, spec.between_col)?;
    let data = melt(&projected, spec, &measures)?;

    tracing::info!(
        wide_rows = wide.height(),
        measures = measures.len(),
        long_rows = data.height(),
        "Reshaped wide table to long format"
    );

    Ok(LongFrame {
        data,
        measure_columns: measures,
    })
}

/// Keeps exactly the identifier, the measures and the optional between column.
pub fn project_columns(
    wide: &DataFrame,
    id_col: &str,
    measures: &[String],
    between_col: Option<&str>,
) -> Result<DataFrame> {
    let mut names: Vec<&str> = Vec::with_capacity(measures.len() + 2);
    names.push(id_col);
    names.extend(measures.iter().map(String::as_str));
    names.extend(between_col);
    Ok(wide.select(names)?)
}

fn require_column(available: &[String], column: &str) -> Result<()> {
    if available.iter().any(|name| name == column) {
        Ok(())
    } else {
        Err(TransformError::ColumnNotFound {
            column: column.to_string(),
            available: available.to_vec(),
        })
    }
}

fn check_conflicts(spec: &ReshapeSpec<'_>, measures: &[String]) -> Result<()> {
    let conflict = |column: &str, first, second| {
        Err(TransformError::ColumnConflict {
            column: column.to_string(),
            first,
            second,
        })
    };

    if measures.iter().any(|m| m == spec.id_col) {
        return conflict(spec.id_col, "subject identifier", "repeated measure");
    }
    if let Some(between) = spec.between_col {
        if between == spec.id_col {
            return conflict(between, "subject identifier", "between-subjects factor");
        }
        if measures.iter().any(|m| m == between) {
            return conflict(between, "between-subjects factor", "repeated measure");
        }
        if spec.within_name == between {
            return conflict(between, "between-subjects factor", "within factor");
        }
        if spec.dv_name == between {
            return conflict(between, "between-subjects factor", "dependent variable");
        }
    }
    if spec.within_name == spec.id_col {
        return conflict(spec.id_col, "subject identifier", "within factor");
    }
    if spec.dv_name == spec.id_col {
        return conflict(spec.id_col, "subject identifier", "dependent variable");
    }
    if spec.within_name == spec.dv_name {
        return conflict(spec.dv_name, "within factor", "dependent variable");
    }
    Ok(())
}

/// Picks the dtype shared by every measure column.
///
/// Identical dtypes are kept; mixed numeric (or all-null) columns widen to
/// `Float64`; anything else cannot be stacked into one value column.
fn measure_dtype(projected: &DataFrame, measures: &[String]) -> Result<DataType> {
    let mut dtypes = Vec::with_capacity(measures.len());
    for measure in measures {
        dtypes.push(projected.column(measure)?.dtype().clone());
    }
    let Some(first) = dtypes.first().cloned() else {
        return Err(TransformError::EmptySelection);
    };

    if dtypes.iter().all(|dtype| *dtype == first) {
        return Ok(first);
    }
    if dtypes
        .iter()
        .all(|dtype| dtype.is_primitive_numeric() || *dtype == DataType::Null)
    {
        return Ok(DataType::Float64);
    }
    Err(TransformError::IncompatibleMeasureTypes {
        types: measures
            .iter()
            .cloned()
            .zip(dtypes.iter().map(ToString::to_string))
            .collect(),
    })
}

fn melt(projected: &DataFrame, spec: &ReshapeSpec<'_>, measures: &[String]) -> Result<DataFrame> {
    let height = projected.height();
    let dtype = measure_dtype(projected, measures)?;
    let id = projected.column(spec.id_col)?;
    let between = spec
        .between_col
        .map(|name| projected.column(name))
        .transpose()?;

    let mut long: Option<DataFrame> = None;
    for measure in measures {
        let mut columns: Vec<Column> = Vec::with_capacity(4);
        columns.push(id.clone());
        columns.push(Column::new(
            spec.within_name.into(),
            vec![measure.as_str(); height],
        ));
        columns.push(
            projected
                .column(measure)?
                .cast(&dtype)?
                .with_name(spec.dv_name.into()),
        );
        if let Some(between) = between {
            columns.push(between.clone());
        }
        let block = DataFrame::new(columns)?;

        if let Some(existing) = long.as_mut() {
            existing.vstack_mut(&block)?;
        } else {
            long = Some(block);
        }
    }

    let mut long = long.ok_or(TransformError::EmptySelection)?;
    long.as_single_chunk_par();
    Ok(long)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide() -> DataFrame {
        DataFrame::new(vec![
            Column::new("ID".into(), vec!["s1", "s2"]),
            Column::new("T1".into(), vec![1i64, 2]),
            Column::new("T2".into(), vec![1.5f64, 2.5]),
            Column::new("NOTE".into(), vec!["x", "y"]),
        ])
        .unwrap()
    }

    fn spec<'a>(selector: &'a ColumnSelector) -> ReshapeSpec<'a> {
        ReshapeSpec {
            id_col: "ID",
            within: selector,
            within_name: "time",
            dv_name: "score",
            between_col: None,
        }
    }

    #[test]
    fn project_drops_unselected_columns() {
        let measures = vec!["T2".to_string()];
        let projected = project_columns(&wide(), "ID", &measures, None).unwrap();
        assert_eq!(column_names(&projected), vec!["ID", "T2"]);
    }

    #[test]
    fn mixed_numeric_measures_widen_to_float() {
        let selector = ColumnSelector::explicit(["T1", "T2"]);
        let long = reshape_to_long(&wide(), &spec(&selector)).unwrap();
        let score = long.data.column("score").unwrap();
        assert_eq!(score.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = score.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(1.5), Some(2.5)]);
    }

    #[test]
    fn stacked_blocks_are_rechunked() {
        let selector = ColumnSelector::explicit(["T1", "T2"]);
        let long = reshape_to_long(&wide(), &spec(&selector)).unwrap();
        for column in long.data.get_columns() {
            assert_eq!(column.as_materialized_series().n_chunks(), 1);
        }
    }

    #[test]
    fn text_and_numeric_measures_are_incompatible() {
        let selector = ColumnSelector::explicit(["T1", "NOTE"]);
        let err = reshape_to_long(&wide(), &spec(&selector)).unwrap_err();
        assert!(matches!(err, TransformError::IncompatibleMeasureTypes { .. }));
    }

    #[test]
    fn conflicting_names_are_rejected() {
        let selector = ColumnSelector::explicit(["T1"]);
        let mut same = spec(&selector);
        same.dv_name = "time";
        assert!(matches!(
            reshape_to_long(&wide(), &same),
            Err(TransformError::ColumnConflict { column, .. }) if column == "time"
        ));

        let with_id = ColumnSelector::explicit(["ID", "T1"]);
        assert!(matches!(
            reshape_to_long(&wide(), &spec(&with_id)),
            Err(TransformError::ColumnConflict { column, .. }) if column == "ID"
        ));
    }

    #[test]
    fn missing_identifier_is_reported() {
        let selector = ColumnSelector::explicit(["T1"]);
        let mut missing = spec(&selector);
        missing.id_col = "SUBJECT";
        assert!(matches!(
            reshape_to_long(&wide(), &missing),
            Err(TransformError::ColumnNotFound { column, .. }) if column == "SUBJECT"
        ));
    }
}
