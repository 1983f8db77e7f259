use thiserror::Error;

/// Errors raised while building analysis requests.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The `regex:` selector does not compile.
    #[error("invalid column pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Unrecognized p-value correction name.
    #[error("unknown correction method '{0}' (expected one of: none, bonf, sidak, holm, fdr_bh, fdr_by)")]
    UnknownCorrection(String),

    /// Unrecognized effect-size name.
    #[error("unknown effect size '{0}' (expected one of: none, cohen, hedges)")]
    UnknownEffectSize(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
