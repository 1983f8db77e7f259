//! The statistics collaborator used by the analysis entry point.

use polars::prelude::DataFrame;
use rma_model::{AnalysisDesign, PosthocOptions, WithinFactors};

use crate::error::Result;

/// Statistical routines over a long-format table.
///
/// Implementations own the schema of the tables they return. Errors are
/// surfaced to the caller unchanged.
pub trait StatisticsBackend {
    /// One-way repeated-measures ANOVA on the within factor.
    ///
    /// `detailed` requests sums of squares, the error term and sphericity
    /// correction columns.
    fn rm_anova(&self, long: &DataFrame, factors: &WithinFactors, detailed: bool)
    -> Result<DataFrame>;

    /// Mixed ANOVA: the within factor crossed with one between-subjects factor.
    fn mixed_anova(
        &self,
        long: &DataFrame,
        factors: &WithinFactors,
        between: &str,
    ) -> Result<DataFrame>;

    /// Pairwise comparisons of within levels (and between levels when the
    /// design has a between factor).
    fn pairwise_tests(
        &self,
        long: &DataFrame,
        design: &AnalysisDesign,
        options: &PosthocOptions,
    ) -> Result<DataFrame>;
}

impl<T: StatisticsBackend + ?Sized> StatisticsBackend for &T {
    fn rm_anova(
        &self,
        long: &DataFrame,
        factors: &WithinFactors,
        detailed: bool,
    ) -> Result<DataFrame> {
        (**self).rm_anova(long, factors, detailed)
    }

    fn mixed_anova(
        &self,
        long: &DataFrame,
        factors: &WithinFactors,
        between: &str,
    ) -> Result<DataFrame> {
        (**self).mixed_anova(long, factors, between)
    }

    fn pairwise_tests(
        &self,
        long: &DataFrame,
        design: &AnalysisDesign,
        options: &PosthocOptions,
    ) -> Result<DataFrame> {
        (**self).pairwise_tests(long, design, options)
    }
}
