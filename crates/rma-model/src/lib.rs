//! Data model for repeated-measures reshape and analysis.
//!
//! # Module Organization
//!
//! - [`selector`]: Repeated-measures column selection (explicit list or `regex:` pattern)
//! - [`design`]: Analysis design (within-only vs within × between)
//! - [`options`]: Post-hoc correction and effect-size settings
//! - [`request`]: The full analysis request, deserializable from JSON

pub mod design;
pub mod error;
pub mod options;
pub mod request;
pub mod selector;

pub use design::{AnalysisDesign, WithinFactors};
pub use error::{ModelError, Result};
pub use options::{CorrectionMethod, EffectSize, PosthocOptions};
pub use request::{AnalysisRequest, DEFAULT_WITHIN_NAME};
pub use selector::{ColumnSelector, REGEX_PREFIX};
