//! Error type of the analysis entry point.

use thiserror::Error;

use rma_stats::StatsError;
use rma_transform::TransformError;

/// Failure of a reshape-and-analyze call. No partial results are returned.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Column selection or reshaping failed; raised before any statistics run.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The statistics backend failed; passed through unchanged.
    #[error(transparent)]
    Statistics(#[from] StatsError),
}

impl AnalysisError {
    /// True for selection/reshape problems the caller can fix in the request.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Transform(_))
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
