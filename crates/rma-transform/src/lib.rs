//! Wide-to-long reshaping for repeated-measures tables.
//!
//! This crate provides:
//! - **Column resolution**: turn an explicit list or a `regex:` pattern into
//!   an ordered list of repeated-measures columns
//! - **Projection**: keep only the identifier, measure and between columns
//! - **Melt**: stack measure columns into a within-factor label column and a
//!   dependent-variable value column
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use polars::prelude::*;
//! use rma_model::ColumnSelector;
//! use rma_transform::{ReshapeSpec, reshape_to_long};
//!
//! let wide = DataFrame::new(vec![
//!     Column::new("PARTICIPANT".into(), ["P1", "P2"]),
//!     Column::new("T1".into(), [10.0, 8.0]),
//!     Column::new("T2".into(), [12.0, 11.0]),
//!     Column::new("AGE".into(), [34i64, 41]),
//! ])?;
//!
//! let selector = ColumnSelector::parse(r"regex:^T\d")?;
//! let spec = ReshapeSpec {
//!     id_col: "PARTICIPANT",
//!     within: &selector,
//!     within_name: "time",
//!     dv_name: "score",
//!     between_col: None,
//! };
//! let long = reshape_to_long(&wide, &spec)?;
//!
//! assert_eq!(long.measure_columns, ["T1", "T2"]);
//! assert_eq!(long.data.height(), 4);
//! # Ok(())
//! # }
//! ```

mod error;
mod reshape;
mod resolve;

pub use error::{Result, TransformError};
pub use reshape::{LongFrame, ReshapeSpec, project_columns, reshape_to_long};
pub use resolve::resolve_columns;
