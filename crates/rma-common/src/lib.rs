//! Shared utilities for the repeated-measures analysis crates.
//!
//! This crate provides Polars helpers used across the workspace: rendering
//! `AnyValue`s as grouping labels and extracting numeric values.

pub mod polars;

pub use polars::{any_to_f64, any_to_label, column_labels, column_names, format_numeric};
