//! The three tables returned by an analysis.

use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Key of one table in an [`AnalysisBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleKey {
    LongData,
    AnovaTable,
    PosthocTable,
}

impl BundleKey {
    /// All keys, in bundle order.
    pub const ALL: [BundleKey; 3] = [Self::LongData, Self::AnovaTable, Self::PosthocTable];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LongData => "long_data",
            Self::AnovaTable => "anova_table",
            Self::PosthocTable => "posthoc_table",
        }
    }
}

impl fmt::Display for BundleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Long-format data, ANOVA table and post-hoc table of one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisBundle {
    pub long_data: DataFrame,
    pub anova_table: DataFrame,
    pub posthoc_table: DataFrame,
}

impl AnalysisBundle {
    pub fn get(&self, key: BundleKey) -> &DataFrame {
        match key {
            BundleKey::LongData => &self.long_data,
            BundleKey::AnovaTable => &self.anova_table,
            BundleKey::PosthocTable => &self.posthoc_table,
        }
    }

    /// Consumes the bundle into `(key, table)` pairs in bundle order.
    pub fn into_tables(self) -> [(BundleKey, DataFrame); 3] {
        [
            (BundleKey::LongData, self.long_data),
            (BundleKey::AnovaTable, self.anova_table),
            (BundleKey::PosthocTable, self.posthoc_table),
        ]
    }
}
