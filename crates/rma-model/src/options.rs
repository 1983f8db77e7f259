//! Post-hoc comparison settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Multiple-comparison p-value adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorrectionMethod {
    /// No adjustment.
    #[serde(rename = "none")]
    None,
    /// Bonferroni: p × m, capped at 1.
    #[default]
    #[serde(rename = "bonf")]
    Bonferroni,
    /// Šidák: 1 − (1 − p)^m.
    #[serde(rename = "sidak")]
    Sidak,
    /// Holm step-down.
    #[serde(rename = "holm")]
    Holm,
    /// Benjamini–Hochberg false discovery rate.
    #[serde(rename = "fdr_bh")]
    FdrBh,
    /// Benjamini–Yekutieli false discovery rate.
    #[serde(rename = "fdr_by")]
    FdrBy,
}

impl CorrectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bonferroni => "bonf",
            Self::Sidak => "sidak",
            Self::Holm => "holm",
            Self::FdrBh => "fdr_bh",
            Self::FdrBy => "fdr_by",
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "bonf" | "bonferroni" => Ok(Self::Bonferroni),
            "sidak" => Ok(Self::Sidak),
            "holm" => Ok(Self::Holm),
            "fdr_bh" | "fdr" => Ok(Self::FdrBh),
            "fdr_by" => Ok(Self::FdrBy),
            _ => Err(ModelError::UnknownCorrection(s.to_string())),
        }
    }
}

/// Standardized mean-difference effect size reported for each contrast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectSize {
    None,
    Cohen,
    #[default]
    Hedges,
}

impl EffectSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cohen => "cohen",
            Self::Hedges => "hedges",
        }
    }
}

impl fmt::Display for EffectSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectSize {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "cohen" => Ok(Self::Cohen),
            "hedges" => Ok(Self::Hedges),
            _ => Err(ModelError::UnknownEffectSize(s.to_string())),
        }
    }
}

/// Options for pairwise post-hoc tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PosthocOptions {
    pub correction: CorrectionMethod,
    pub effect_size: EffectSize,
}

impl PosthocOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correction(mut self, correction: CorrectionMethod) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_effect_size(mut self, effect_size: EffectSize) -> Self {
        self.effect_size = effect_size;
        self
    }
}
