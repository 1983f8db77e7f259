//! Built-in backend: classical sums-of-squares ANOVA and t-test post-hocs.

use polars::prelude::DataFrame;

use rma_model::{AnalysisDesign, PosthocOptions, WithinFactors};

use crate::anova::{mixed_anova_table, rm_anova_table};
use crate::backend::StatisticsBackend;
use crate::cells::build_matrix;
use crate::error::Result;
use crate::posthoc::pairwise_table;

/// Complete-case ANOVA with Greenhouse–Geisser epsilon and pairwise t-tests.
///
/// Cells with several observations are averaged; subjects missing any
/// within level are excluded before testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalBackend;

impl ClassicalBackend {
    pub fn new() -> Self {
        Self
    }
}

impl StatisticsBackend for ClassicalBackend {
    fn rm_anova(
        &self,
        long: &DataFrame,
        factors: &WithinFactors,
        detailed: bool,
    ) -> Result<DataFrame> {
        let matrix = build_matrix(long, factors, None)?;
        rm_anova_table(&matrix, &factors.within, detailed)
    }

    fn mixed_anova(
        &self,
        long: &DataFrame,
        factors: &WithinFactors,
        between: &str,
    ) -> Result<DataFrame> {
        let matrix = build_matrix(long, factors, Some(between))?;
        mixed_anova_table(&matrix, &factors.within, between)
    }

    fn pairwise_tests(
        &self,
        long: &DataFrame,
        design: &AnalysisDesign,
        options: &PosthocOptions,
    ) -> Result<DataFrame> {
        let matrix = build_matrix(long, design.factors(), design.between())?;
        pairwise_table(&matrix, design, options)
    }
}
