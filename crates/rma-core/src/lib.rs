//! Reshape-and-analyze for repeated-measures experiments.
//!
//! A wide table with one row per subject and one column per repeated
//! measurement is melted to long format, then analysed with a
//! repeated-measures ANOVA (within factor only) or a mixed ANOVA (within and
//! between factors), followed by pairwise post-hoc comparisons.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use polars::prelude::*;
//! use rma_core::{AnalysisRequest, BundleKey, ColumnSelector, reshape_and_analyze_default};
//!
//! let wide = DataFrame::new(vec![
//!     Column::new("PARTICIPANT".into(), ["P1", "P2", "P3", "P4", "P5", "P6", "P7"]),
//!     Column::new("T1".into(), [5.0, 6.0, 4.0, 6.0, 7.0, 5.0, 6.0]),
//!     Column::new("T2".into(), [7.0, 8.0, 6.0, 6.0, 8.0, 6.0, 7.0]),
//!     Column::new("T3".into(), [9.0, 9.0, 10.0, 7.0, 8.0, 6.0, 9.0]),
//!     Column::new("GROUP".into(), ["a", "a", "a", "b", "b", "b", "b"]),
//! ])?;
//!
//! let selector = ColumnSelector::parse(r"regex:^T\d")?;
//! let request = AnalysisRequest::new("PARTICIPANT", "score", selector)
//!     .with_within_name("time")
//!     .with_between("GROUP");
//! let bundle = reshape_and_analyze_default(&wide, &request)?;
//!
//! assert_eq!(bundle.get(BundleKey::LongData).height(), 21);
//! assert_eq!(bundle.get(BundleKey::AnovaTable).height(), 3);
//! # Ok(())
//! # }
//! ```

mod analyze;
mod bundle;
mod dispatch;
mod error;

pub use analyze::{reshape_and_analyze, reshape_and_analyze_default};
pub use bundle::{AnalysisBundle, BundleKey};
pub use dispatch::{run_anova, run_posthoc};
pub use error::{AnalysisError, Result};

pub use rma_model::{AnalysisRequest, ColumnSelector, CorrectionMethod, EffectSize};
pub use rma_stats::{ClassicalBackend, StatisticsBackend};
