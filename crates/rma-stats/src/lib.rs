//! Statistical routines for long-format repeated-measures tables.
//!
//! The [`StatisticsBackend`] trait is the seam between reshaping and
//! statistics: it offers a repeated-measures ANOVA, a mixed ANOVA and
//! pairwise post-hoc tests over a long table. [`ClassicalBackend`] is the
//! built-in implementation.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use polars::prelude::*;
//! use rma_model::WithinFactors;
//! use rma_stats::{ClassicalBackend, StatisticsBackend};
//!
//! let long = DataFrame::new(vec![
//!     Column::new("PARTICIPANT".into(), ["P1", "P2", "P3", "P1", "P2", "P3"]),
//!     Column::new("time".into(), ["T1", "T1", "T1", "T2", "T2", "T2"]),
//!     Column::new("score".into(), [1.0, 2.0, 4.0, 3.0, 3.0, 6.0]),
//! ])?;
//!
//! let factors = WithinFactors::new("PARTICIPANT", "time", "score");
//! let anova = ClassicalBackend.rm_anova(&long, &factors, true)?;
//! assert_eq!(anova.height(), 2);
//! # Ok(())
//! # }
//! ```

mod anova;
mod backend;
mod cells;
mod classical;
mod correction;
mod distribution;
mod error;
mod posthoc;

pub use anova::{ERROR_SOURCE, INTERACTION_SOURCE};
pub use backend::StatisticsBackend;
pub use classical::ClassicalBackend;
pub use correction::adjust_pvalues;
pub use error::{Result, StatsError};
pub use posthoc::{TTest, effect_size, independent_ttest, paired_ttest};
