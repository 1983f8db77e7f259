//! Polars AnyValue utility functions.
//!
//! Helpers for turning cells into grouping labels (subject identifiers,
//! condition names, group names) and numeric observations.

use polars::prelude::*;

/// Converts a Polars `AnyValue` into a grouping label.
///
/// Returns `None` for `Null`. Floating-point values are formatted without
/// trailing zeros so that `1.0` and `1` label the same subject.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use rma_common::any_to_label;
///
/// assert_eq!(any_to_label(AnyValue::Null), None);
/// assert_eq!(any_to_label(AnyValue::Int32(42)), Some("42".to_string()));
/// assert_eq!(any_to_label(AnyValue::Float64(3.0)), Some("3".to_string()));
/// assert_eq!(any_to_label(AnyValue::String("S01")), Some("S01".to_string()));
/// ```
pub fn any_to_label(value: AnyValue<'_>) -> Option<String> {
    let label = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => strip_outer_quotes(other.to_string()),
    };
    Some(label)
}

/// Categorical and enum values display with surrounding quotes.
fn strip_outer_quotes(s: String) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use rma_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts a numeric `AnyValue` to `f64`.
///
/// Returns `None` for nulls, NaN, and non-numeric values. Strings are not
/// parsed: a dependent variable stored as text is a data problem the caller
/// reports, not something to coerce silently.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let v = match value {
        AnyValue::Int8(v) => f64::from(v),
        AnyValue::Int16(v) => f64::from(v),
        AnyValue::Int32(v) => f64::from(v),
        AnyValue::Int64(v) => v as f64,
        AnyValue::UInt8(v) => f64::from(v),
        AnyValue::UInt16(v) => f64::from(v),
        AnyValue::UInt32(v) => f64::from(v),
        AnyValue::UInt64(v) => v as f64,
        AnyValue::Float32(v) => f64::from(v),
        AnyValue::Float64(v) => v,
        _ => return None,
    };
    if v.is_nan() { None } else { Some(v) }
}

/// Reads a column as grouping labels, one entry per row.
pub fn column_labels(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?.as_materialized_series().rechunk();
    Ok(series.iter().map(any_to_label).collect())
}

/// Returns the frame's column names as owned strings, in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
