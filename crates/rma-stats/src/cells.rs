//! Subject × level matrix built from a long table.
//!
//! Every statistical routine works on the same preprocessed view: one value
//! per (subject, within level) cell, duplicates averaged, and subjects with
//! any empty cell dropped listwise.

use std::collections::HashMap;

use polars::prelude::{DataFrame, DataType};

use rma_common::{any_to_f64, column_labels};
use rma_model::WithinFactors;

use crate::error::{Result, StatsError};

/// Complete-case data of a design.
#[derive(Debug, Clone)]
pub(crate) struct SubjectMatrix {
    /// Within levels in first-appearance order.
    pub levels: Vec<String>,
    /// Subjects with a value for every level.
    pub subjects: Vec<String>,
    /// `values[subject][level]`.
    pub values: Vec<Vec<f64>>,
    /// Between levels in first-appearance order (empty without a between factor).
    pub groups: Vec<String>,
    /// Group index of each subject (empty without a between factor).
    pub subject_group: Vec<usize>,
}

impl SubjectMatrix {
    pub fn n_subjects(&self) -> usize {
        self.subjects.len()
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Values of one level across subjects.
    pub fn level_values(&self, level: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[level]).collect()
    }

    /// Subjects' means across levels, grouped by between level.
    pub fn group_subject_means(&self) -> Vec<Vec<f64>> {
        let mut grouped = vec![Vec::new(); self.groups.len()];
        for (row, &group) in self.values.iter().zip(&self.subject_group) {
            grouped[group].push(mean(row));
        }
        grouped
    }

    /// Values of one level, grouped by between level.
    pub fn group_level_values(&self, level: usize) -> Vec<Vec<f64>> {
        let mut grouped = vec![Vec::new(); self.groups.len()];
        for (row, &group) in self.values.iter().zip(&self.subject_group) {
            grouped[group].push(row[level]);
        }
        grouped
    }
}

#[derive(Default, Clone, Copy)]
struct CellAccumulator {
    sum: f64,
    count: usize,
}

/// Assigns dense indices to labels in first-appearance order.
#[derive(Default)]
struct LabelIndex {
    labels: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl LabelIndex {
    fn index_of(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.lookup.get(label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.to_string());
        self.lookup.insert(label.to_string(), idx);
        idx
    }
}

fn require_column<'a>(long: &'a DataFrame, column: &str) -> Result<&'a polars::prelude::Column> {
    long.column(column).map_err(|_| StatsError::ColumnNotFound {
        column: column.to_string(),
    })
}

/// Builds the complete-case subject matrix of a long table.
pub(crate) fn build_matrix(
    long: &DataFrame,
    factors: &WithinFactors,
    between: Option<&str>,
) -> Result<SubjectMatrix> {
    let dv = require_column(long, &factors.dv)?;
    let dtype = dv.dtype();
    if !(dtype.is_primitive_numeric() || *dtype == DataType::Null) {
        return Err(StatsError::NonNumericDependent {
            column: factors.dv.clone(),
            dtype: dtype.to_string(),
        });
    }
    require_column(long, &factors.subject)?;
    require_column(long, &factors.within)?;
    if let Some(between) = between {
        require_column(long, between)?;
    }

    let subjects = column_labels(long, &factors.subject)?;
    let levels = column_labels(long, &factors.within)?;
    let groups = between
        .map(|column| column_labels(long, column))
        .transpose()?;
    let dv_series = dv.as_materialized_series().rechunk();
    let values: Vec<Option<f64>> = dv_series.iter().map(any_to_f64).collect();

    let mut subject_index = LabelIndex::default();
    let mut level_index = LabelIndex::default();
    let mut cells: HashMap<(usize, usize), CellAccumulator> = HashMap::new();
    let mut membership: HashMap<usize, String> = HashMap::new();

    for row in 0..long.height() {
        let (Some(subject), Some(level)) = (&subjects[row], &levels[row]) else {
            continue;
        };
        let s = subject_index.index_of(subject);
        let l = level_index.index_of(level);

        if let (Some(groups), Some(factor)) = (&groups, between) {
            if let Some(group) = &groups[row] {
                match membership.get(&s) {
                    Some(existing) if existing != group => {
                        return Err(StatsError::InconsistentGroup {
                            subject: subject.clone(),
                            factor: factor.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        membership.insert(s, group.clone());
                    }
                }
            }
        }

        let cell = cells.entry((s, l)).or_default();
        if let Some(value) = values[row] {
            cell.sum += value;
            cell.count += 1;
        }
    }

    let n_levels = level_index.labels.len();
    if n_levels < 2 {
        return Err(StatsError::TooFewLevels {
            factor: factors.within.clone(),
            found: n_levels,
        });
    }

    let mut group_index = LabelIndex::default();
    let mut matrix = SubjectMatrix {
        levels: level_index.labels,
        subjects: Vec::new(),
        values: Vec::new(),
        groups: Vec::new(),
        subject_group: Vec::new(),
    };

    let mut dropped = 0usize;
    for (s, subject) in subject_index.labels.iter().enumerate() {
        let row: Option<Vec<f64>> = (0..n_levels)
            .map(|l| {
                cells
                    .get(&(s, l))
                    .filter(|cell| cell.count > 0)
                    .map(|cell| cell.sum / cell.count as f64)
            })
            .collect();
        let group = membership.get(&s).map(String::as_str);
        match (row, between, group) {
            (Some(row), None, _) => {
                matrix.subjects.push(subject.clone());
                matrix.values.push(row);
            }
            (Some(row), Some(_), Some(group)) => {
                matrix.subjects.push(subject.clone());
                matrix.values.push(row);
                matrix.subject_group.push(group_index.index_of(group));
            }
            _ => dropped += 1,
        }
    }
    matrix.groups = group_index.labels;

    if dropped > 0 {
        tracing::debug!(
            dropped,
            kept = matrix.n_subjects(),
            "Dropped subjects with incomplete repeated measures"
        );
    }

    if matrix.n_subjects() < 2 {
        return Err(StatsError::TooFewSubjects {
            scope: "the design".to_string(),
            found: matrix.n_subjects(),
        });
    }

    if let Some(factor) = between {
        if matrix.groups.len() < 2 {
            return Err(StatsError::TooFewLevels {
                factor: factor.to_string(),
                found: matrix.groups.len(),
            });
        }
        for (g, group) in matrix.groups.iter().enumerate() {
            let found = matrix.subject_group.iter().filter(|&&idx| idx == g).count();
            if found < 2 {
                return Err(StatsError::TooFewSubjects {
                    scope: format!("group '{group}'"),
                    found,
                });
            }
        }
    }

    Ok(matrix)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (ddof = 1).
pub(crate) fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom};

    fn factors() -> WithinFactors {
        WithinFactors::new("ID", "time", "score")
    }

    #[test]
    fn averages_duplicates_and_drops_incomplete_subjects() {
        let long = DataFrame::new(vec![
            Column::new("ID".into(), vec!["a", "b", "c", "a", "b", "c", "a"]),
            Column::new("time".into(), vec!["T1", "T1", "T1", "T2", "T2", "T2", "T2"]),
            Column::new(
                "score".into(),
                vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), None, Some(6.0)],
            ),
        ])
        .unwrap();

        let matrix = build_matrix(&long, &factors(), None).unwrap();
        assert_eq!(matrix.levels, vec!["T1", "T2"]);
        assert_eq!(matrix.subjects, vec!["a", "b"]);
        assert_eq!(matrix.values, vec![vec![1.0, 5.0], vec![2.0, 5.0]]);
    }

    #[test]
    fn rejects_text_dependent_variable() {
        let long = DataFrame::new(vec![
            Column::new("ID".into(), vec!["a", "a"]),
            Column::new("time".into(), vec!["T1", "T2"]),
            Column::new("score".into(), vec!["high", "low"]),
        ])
        .unwrap();

        assert!(matches!(
            build_matrix(&long, &factors(), None),
            Err(StatsError::NonNumericDependent { .. })
        ));
    }

    #[test]
    fn single_level_is_rejected() {
        let long = DataFrame::new(vec![
            Column::new("ID".into(), vec!["a", "b"]),
            Column::new("time".into(), vec!["T1", "T1"]),
            Column::new("score".into(), vec![1.0, 2.0]),
        ])
        .unwrap();

        assert!(matches!(
            build_matrix(&long, &factors(), None),
            Err(StatsError::TooFewLevels { found: 1, .. })
        ));
    }

    #[test]
    fn subject_in_two_groups_is_rejected() {
        let long = DataFrame::new(vec![
            Column::new("ID".into(), vec!["a", "a"]),
            Column::new("time".into(), vec!["T1", "T2"]),
            Column::new("score".into(), vec![1.0, 2.0]),
            Column::new("GROUP".into(), vec!["x", "y"]),
        ])
        .unwrap();

        assert!(matches!(
            build_matrix(&long, &factors(), Some("GROUP")),
            Err(StatsError::InconsistentGroup { subject, .. }) if subject == "a"
        ));
    }

    #[test]
    fn groups_need_two_subjects() {
        let long = DataFrame::new(vec![
            Column::new("ID".into(), vec!["a", "b", "c", "a", "b", "c"]),
            Column::new("time".into(), vec!["T1", "T1", "T1", "T2", "T2", "T2"]),
            Column::new("score".into(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            Column::new("GROUP".into(), vec!["x", "x", "y", "x", "x", "y"]),
        ])
        .unwrap();

        assert!(matches!(
            build_matrix(&long, &factors(), Some("GROUP")),
            Err(StatsError::TooFewSubjects { found: 1, .. })
        ));
    }

    #[test]
    fn variance_uses_sample_denominator() {
        assert!((variance(&[1.0, 2.0, 3.0, 4.0]) - 5.0 / 3.0).abs() < 1e-12);
    }
}
