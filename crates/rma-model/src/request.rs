//! Analysis request: everything `reshape_and_analyze` needs besides the table.

use serde::{Deserialize, Serialize};

use crate::design::{AnalysisDesign, WithinFactors};
use crate::options::{CorrectionMethod, EffectSize, PosthocOptions};
use crate::selector::ColumnSelector;

/// Default name of the within-subject factor column in the long table.
pub const DEFAULT_WITHIN_NAME: &str = "condition";

fn default_within_name() -> String {
    DEFAULT_WITHIN_NAME.to_string()
}

/// Parameters of one reshape-and-analyze call.
///
/// # Example
///
/// ```
/// use rma_model::{AnalysisRequest, ColumnSelector, CorrectionMethod};
///
/// let selector = ColumnSelector::explicit(["T1", "T2"]);
/// let request = AnalysisRequest::new("PARTICIPANT", "score", selector)
///     .with_within_name("time")
///     .with_between("GROUP")
///     .with_correction(CorrectionMethod::Holm);
///
/// assert_eq!(request.within_name, "time");
/// assert_eq!(request.design().between(), Some("GROUP"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Subject identifier column of the wide table.
    pub id_col: String,

    /// Name of the dependent-variable column created in the long table.
    pub dv_name: String,

    /// Repeated-measures columns of the wide table.
    pub within_cols: ColumnSelector,

    /// Name of the within-subject factor column created in the long table.
    #[serde(default = "default_within_name")]
    pub within_name: String,

    /// Optional between-subjects column of the wide table.
    #[serde(default)]
    pub between_col: Option<String>,

    /// P-value adjustment for post-hoc comparisons.
    #[serde(default)]
    pub posthoc_correction: CorrectionMethod,

    /// Effect size reported for post-hoc comparisons.
    #[serde(default)]
    pub effect_size: EffectSize,
}

impl AnalysisRequest {
    pub fn new(
        id_col: impl Into<String>,
        dv_name: impl Into<String>,
        within_cols: impl Into<ColumnSelector>,
    ) -> Self {
        Self {
            id_col: id_col.into(),
            dv_name: dv_name.into(),
            within_cols: within_cols.into(),
            within_name: default_within_name(),
            between_col: None,
            posthoc_correction: CorrectionMethod::default(),
            effect_size: EffectSize::default(),
        }
    }

    #[must_use]
    pub fn with_within_name(mut self, name: impl Into<String>) -> Self {
        self.within_name = name.into();
        self
    }

    #[must_use]
    pub fn with_between(mut self, column: impl Into<String>) -> Self {
        self.between_col = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_correction(mut self, correction: CorrectionMethod) -> Self {
        self.posthoc_correction = correction;
        self
    }

    #[must_use]
    pub fn with_effect_size(mut self, effect_size: EffectSize) -> Self {
        self.effect_size = effect_size;
        self
    }

    /// Design of the long table this request produces.
    pub fn design(&self) -> AnalysisDesign {
        AnalysisDesign::from_parts(
            WithinFactors::new(&self.id_col, &self.within_name, &self.dv_name),
            self.between_col.clone(),
        )
    }

    pub fn posthoc_options(&self) -> PosthocOptions {
        PosthocOptions::new()
            .with_correction(self.posthoc_correction)
            .with_effect_size(self.effect_size)
    }
}
