//! Analysis design: which ANOVA variant a long table is analyzed with.

use serde::{Deserialize, Serialize};

/// Column roles shared by every design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithinFactors {
    /// Subject identifier column (grouping key for repeated measurements).
    pub subject: String,
    /// Within-subject factor column (condition labels).
    pub within: String,
    /// Dependent-variable column.
    pub dv: String,
}

impl WithinFactors {
    pub fn new(
        subject: impl Into<String>,
        within: impl Into<String>,
        dv: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            within: within.into(),
            dv: dv.into(),
        }
    }
}

/// Analysis design, decided once from the presence of a between-subjects column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisDesign {
    /// One within-subject factor: repeated-measures ANOVA.
    WithinOnly(WithinFactors),
    /// One within-subject factor crossed with one between-subjects factor: mixed ANOVA.
    WithinBetween {
        factors: WithinFactors,
        between: String,
    },
}

impl AnalysisDesign {
    /// Builds the design from an optional between-subjects column.
    pub fn from_parts(factors: WithinFactors, between: Option<String>) -> Self {
        match between {
            Some(between) => Self::WithinBetween { factors, between },
            None => Self::WithinOnly(factors),
        }
    }

    pub fn factors(&self) -> &WithinFactors {
        match self {
            Self::WithinOnly(factors) | Self::WithinBetween { factors, .. } => factors,
        }
    }

    pub fn between(&self) -> Option<&str> {
        match self {
            Self::WithinOnly(_) => None,
            Self::WithinBetween { between, .. } => Some(between.as_str()),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WithinOnly(_) => "within-only",
            Self::WithinBetween { .. } => "within-between",
        }
    }
}
