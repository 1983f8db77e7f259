//! The reshape-and-analyze entry point.

use polars::prelude::DataFrame;

use rma_model::AnalysisRequest;
use rma_stats::{ClassicalBackend, StatisticsBackend};
use rma_transform::{ReshapeSpec, reshape_to_long};

use crate::bundle::AnalysisBundle;
use crate::dispatch::{run_anova, run_posthoc};
use crate::error::Result;

/// Reshapes a wide table to long format and runs the ANOVA and post-hoc
/// comparisons its design calls for.
///
/// Column selection and reshape errors are raised before the backend is
/// called. Backend errors are returned unchanged and no partial bundle is
/// produced.
pub fn reshape_and_analyze<B>(
    data: &DataFrame,
    request: &AnalysisRequest,
    backend: &B,
) -> Result<AnalysisBundle>
where
    B: StatisticsBackend + ?Sized,
{
    let design = request.design();
    tracing::info!(
        id = %request.id_col,
        selector = %request.within_cols,
        design = design.kind(),
        "Starting repeated-measures analysis"
    );

    let long = reshape_to_long(data, &ReshapeSpec::from_request(request))?;
    let anova_table = run_anova(backend, &long.data, &design)?;
    let posthoc_table = run_posthoc(backend, &long.data, &design, &request.posthoc_options())?;

    tracing::info!(
        measures = long.measure_columns.len(),
        long_rows = long.data.height(),
        anova_rows = anova_table.height(),
        posthoc_rows = posthoc_table.height(),
        "Analysis complete"
    );

    Ok(AnalysisBundle {
        long_data: long.data,
        anova_table,
        posthoc_table,
    })
}

/// [`reshape_and_analyze`] with the built-in [`ClassicalBackend`].
pub fn reshape_and_analyze_default(
    data: &DataFrame,
    request: &AnalysisRequest,
) -> Result<AnalysisBundle> {
    reshape_and_analyze(data, request, &ClassicalBackend)
}
