//! Routing of a long table to the ANOVA routine matching its design.

use polars::prelude::DataFrame;

use rma_model::{AnalysisDesign, PosthocOptions};
use rma_stats::StatisticsBackend;

use crate::error::Result;

/// Runs exactly one ANOVA routine for the design.
///
/// Within-only designs get a detailed repeated-measures ANOVA; designs with
/// a between factor get a mixed ANOVA.
pub fn run_anova<B>(backend: &B, long: &DataFrame, design: &AnalysisDesign) -> Result<DataFrame>
where
    B: StatisticsBackend + ?Sized,
{
    let table = match design {
        AnalysisDesign::WithinOnly(factors) => backend.rm_anova(long, factors, true)?,
        AnalysisDesign::WithinBetween { factors, between } => {
            backend.mixed_anova(long, factors, between)?
        }
    };
    tracing::debug!(
        design = design.kind(),
        rows = table.height(),
        "ANOVA table computed"
    );
    Ok(table)
}

/// Runs the pairwise post-hoc comparisons for the design.
pub fn run_posthoc<B>(
    backend: &B,
    long: &DataFrame,
    design: &AnalysisDesign,
    options: &PosthocOptions,
) -> Result<DataFrame>
where
    B: StatisticsBackend + ?Sized,
{
    let table = backend.pairwise_tests(long, design, options)?;
    tracing::debug!(
        comparisons = table.height(),
        correction = %options.correction,
        "Post-hoc table computed"
    );
    Ok(table)
}
