//! Repeated-measures and mixed ANOVA on a complete-case subject matrix.

use polars::prelude::{Column, DataFrame, NamedFrom};

use crate::cells::{SubjectMatrix, mean};
use crate::distribution::{f_ratio, f_sf};
use crate::error::Result;

/// Label of the residual row in detailed repeated-measures tables.
pub const ERROR_SOURCE: &str = "Error";

/// Label of the within × between row in mixed tables.
pub const INTERACTION_SOURCE: &str = "Interaction";

/// Sums of squares of a one-way repeated-measures partition.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RmPartition {
    pub ss_effect: f64,
    pub ss_subjects: f64,
    pub ss_error: f64,
    pub df_effect: f64,
    pub df_error: f64,
}

pub(crate) fn rm_partition(matrix: &SubjectMatrix) -> RmPartition {
    let n = matrix.n_subjects() as f64;
    let k = matrix.n_levels() as f64;
    let grand = grand_mean(&matrix.values);

    let ss_effect = n * (0..matrix.n_levels())
        .map(|l| (mean(&matrix.level_values(l)) - grand).powi(2))
        .sum::<f64>();
    let ss_subjects = k * matrix
        .values
        .iter()
        .map(|row| (mean(row) - grand).powi(2))
        .sum::<f64>();
    let ss_total = total_ss(&matrix.values, grand);

    RmPartition {
        ss_effect,
        ss_subjects,
        ss_error: (ss_total - ss_effect - ss_subjects).max(0.0),
        df_effect: k - 1.0,
        df_error: (n - 1.0) * (k - 1.0),
    }
}

/// One-way repeated-measures ANOVA table.
///
/// Detailed tables carry `Source, SS, DF, MS, F, p-unc, p-GG-corr, ng2, eps`
/// with an `Error` row; compact tables carry
/// `Source, ddof1, ddof2, F, p-unc, ng2, eps` for the effect only.
pub(crate) fn rm_anova_table(
    matrix: &SubjectMatrix,
    within: &str,
    detailed: bool,
) -> Result<DataFrame> {
    let part = rm_partition(matrix);
    let ms_effect = part.ss_effect / part.df_effect;
    let ms_error = part.ss_error / part.df_error;
    let f = f_ratio(ms_effect, ms_error);
    let p = f_sf(f, part.df_effect, part.df_error)?;
    let ng2 = part.ss_effect / (part.ss_effect + part.ss_subjects + part.ss_error);
    let eps = greenhouse_geisser(&matrix.values);

    tracing::debug!(
        factor = within,
        f,
        p,
        eps,
        subjects = matrix.n_subjects(),
        "Computed repeated-measures ANOVA"
    );

    let df = if detailed {
        let p_gg = f_sf(f, part.df_effect * eps, part.df_error * eps)?;
        DataFrame::new(vec![
            Column::new("Source".into(), vec![within, ERROR_SOURCE]),
            Column::new("SS".into(), vec![part.ss_effect, part.ss_error]),
            Column::new(
                "DF".into(),
                vec![part.df_effect as i64, part.df_error as i64],
            ),
            Column::new("MS".into(), vec![ms_effect, ms_error]),
            Column::new("F".into(), vec![Some(f), None]),
            Column::new("p-unc".into(), vec![Some(p), None]),
            Column::new("p-GG-corr".into(), vec![Some(p_gg), None]),
            Column::new("ng2".into(), vec![Some(ng2), None]),
            Column::new("eps".into(), vec![Some(eps), None]),
        ])?
    } else {
        DataFrame::new(vec![
            Column::new("Source".into(), vec![within]),
            Column::new("ddof1".into(), vec![part.df_effect as i64]),
            Column::new("ddof2".into(), vec![part.df_error as i64]),
            Column::new("F".into(), vec![f]),
            Column::new("p-unc".into(), vec![p]),
            Column::new("ng2".into(), vec![ng2]),
            Column::new("eps".into(), vec![eps]),
        ])?
    };
    Ok(df)
}

/// Mixed ANOVA table: between factor, within factor and their interaction.
///
/// Columns: `Source, SS, DF1, DF2, MS, F, p-unc, np2, eps`. Sums of squares
/// are computed from subject-level means, so unequal group sizes are allowed.
pub(crate) fn mixed_anova_table(
    matrix: &SubjectMatrix,
    within: &str,
    between: &str,
) -> Result<DataFrame> {
    let n = matrix.n_subjects() as f64;
    let k = matrix.n_levels() as f64;
    let g = matrix.groups.len() as f64;
    let grand = grand_mean(&matrix.values);

    let mut group_sizes = vec![0usize; matrix.groups.len()];
    for &group in &matrix.subject_group {
        group_sizes[group] += 1;
    }
    let group_means: Vec<f64> = (0..matrix.groups.len())
        .map(|group| {
            let rows: Vec<&Vec<f64>> = matrix
                .values
                .iter()
                .zip(&matrix.subject_group)
                .filter(|(_, member)| **member == group)
                .map(|(row, _)| row)
                .collect();
            rows.iter().map(|row| mean(row)).sum::<f64>() / rows.len() as f64
        })
        .collect();

    let ss_between = k * group_sizes
        .iter()
        .zip(&group_means)
        .map(|(&size, &m)| size as f64 * (m - grand).powi(2))
        .sum::<f64>();
    let ss_subjects = k * matrix
        .values
        .iter()
        .zip(&matrix.subject_group)
        .map(|(row, &group)| (mean(row) - group_means[group]).powi(2))
        .sum::<f64>();
    let ss_within = n * (0..matrix.n_levels())
        .map(|l| (mean(&matrix.level_values(l)) - grand).powi(2))
        .sum::<f64>();

    let mut ss_cells = 0.0;
    for level in 0..matrix.n_levels() {
        for (size, values) in group_sizes.iter().zip(matrix.group_level_values(level)) {
            ss_cells += *size as f64 * (mean(&values) - grand).powi(2);
        }
    }
    let ss_interaction = (ss_cells - ss_between - ss_within).max(0.0);
    let ss_total = total_ss(&matrix.values, grand);
    let ss_error = (ss_total - ss_between - ss_subjects - ss_within - ss_interaction).max(0.0);

    let df_between = g - 1.0;
    let df_subjects = n - g;
    let df_within = k - 1.0;
    let df_interaction = df_between * df_within;
    let df_error = df_subjects * df_within;

    let ms_between = ss_between / df_between;
    let ms_subjects = ss_subjects / df_subjects;
    let ms_within = ss_within / df_within;
    let ms_interaction = ss_interaction / df_interaction;
    let ms_error = ss_error / df_error;

    let f_between = f_ratio(ms_between, ms_subjects);
    let f_within = f_ratio(ms_within, ms_error);
    let f_interaction = f_ratio(ms_interaction, ms_error);

    let p_between = f_sf(f_between, df_between, df_subjects)?;
    let p_within = f_sf(f_within, df_within, df_error)?;
    let p_interaction = f_sf(f_interaction, df_interaction, df_error)?;

    let eps = greenhouse_geisser(&matrix.values);

    tracing::debug!(
        within,
        between,
        groups = matrix.groups.len(),
        subjects = matrix.n_subjects(),
        "Computed mixed ANOVA"
    );

    let df = DataFrame::new(vec![
        Column::new("Source".into(), vec![between, within, INTERACTION_SOURCE]),
        Column::new("SS".into(), vec![ss_between, ss_within, ss_interaction]),
        Column::new(
            "DF1".into(),
            vec![df_between as i64, df_within as i64, df_interaction as i64],
        ),
        Column::new(
            "DF2".into(),
            vec![df_subjects as i64, df_error as i64, df_error as i64],
        ),
        Column::new("MS".into(), vec![ms_between, ms_within, ms_interaction]),
        Column::new("F".into(), vec![f_between, f_within, f_interaction]),
        Column::new("p-unc".into(), vec![p_between, p_within, p_interaction]),
        Column::new(
            "np2".into(),
            vec![
                partial_eta_squared(ss_between, ss_subjects),
                partial_eta_squared(ss_within, ss_error),
                partial_eta_squared(ss_interaction, ss_error),
            ],
        ),
        Column::new("eps".into(), vec![None, Some(eps), None]),
    ])?;
    Ok(df)
}

/// Greenhouse–Geisser sphericity epsilon of the level covariance matrix.
///
/// Bounded to `[1 / (k - 1), 1]`; two-level designs are always spherical.
pub(crate) fn greenhouse_geisser(values: &[Vec<f64>]) -> f64 {
    let n = values.len();
    let k = values.first().map_or(0, Vec::len);
    if k < 3 || n < 2 {
        return 1.0;
    }

    let means: Vec<f64> = (0..k)
        .map(|j| values.iter().map(|row| row[j]).sum::<f64>() / n as f64)
        .collect();
    let mut cov = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in i..k {
            let c = values
                .iter()
                .map(|row| (row[i] - means[i]) * (row[j] - means[j]))
                .sum::<f64>()
                / (n as f64 - 1.0);
            cov[i][j] = c;
            cov[j][i] = c;
        }
    }

    let row_means: Vec<f64> = cov.iter().map(|row| mean(row)).collect();
    let overall = mean(&row_means);
    let mut trace = 0.0;
    let mut sum_sq = 0.0;
    for i in 0..k {
        for j in 0..k {
            let centered = cov[i][j] - row_means[i] - row_means[j] + overall;
            if i == j {
                trace += centered;
            }
            sum_sq += centered * centered;
        }
    }

    let denominator = (k as f64 - 1.0) * sum_sq;
    if denominator <= 0.0 || !denominator.is_finite() {
        return 1.0;
    }
    let lower = 1.0 / (k as f64 - 1.0);
    (trace * trace / denominator).clamp(lower, 1.0)
}

fn partial_eta_squared(ss_effect: f64, ss_error: f64) -> f64 {
    let total = ss_effect + ss_error;
    if total > 0.0 { ss_effect / total } else { f64::NAN }
}

fn grand_mean(values: &[Vec<f64>]) -> f64 {
    let count: usize = values.iter().map(Vec::len).sum();
    values.iter().flatten().sum::<f64>() / count as f64
}

fn total_ss(values: &[Vec<f64>], grand: f64) -> f64 {
    values.iter().flatten().map(|v| (v - grand).powi(2)).sum()
}
