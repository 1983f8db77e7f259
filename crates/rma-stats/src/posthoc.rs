//! Pairwise post-hoc t-tests with corrected p-values and effect sizes.
//!
//! Contrast families, each corrected separately and reported in this order:
//! 1. within levels (paired tests on every subject),
//! 2. between levels (independent tests on subject means),
//! 3. between levels at each within level (`"<within> * <between>"`).

use polars::prelude::{Column, DataFrame, NamedFrom};

use rma_model::{AnalysisDesign, EffectSize, PosthocOptions};

use crate::cells::{SubjectMatrix, mean, variance};
use crate::correction::adjust_pvalues;
use crate::distribution::t_two_sided;
use crate::error::Result;

/// Outcome of one t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    pub t: f64,
    pub dof: f64,
    pub p: f64,
}

/// Paired-samples t-test of `x - y`.
pub fn paired_ttest(x: &[f64], y: &[f64]) -> Result<TTest> {
    let diffs: Vec<f64> = x.iter().zip(y).map(|(a, b)| a - b).collect();
    let n = diffs.len() as f64;
    let mean_diff = mean(&diffs);
    let se = (variance(&diffs) / n).sqrt();
    let t = ratio(mean_diff, se);
    let dof = n - 1.0;
    Ok(TTest {
        t,
        dof,
        p: t_two_sided(t, dof)?,
    })
}

/// Independent-samples t-test of `x` against `y`.
///
/// Uses Welch's correction when the samples differ in size and the pooled
/// (Student) variance otherwise.
pub fn independent_ttest(x: &[f64], y: &[f64]) -> Result<TTest> {
    let (nx, ny) = (x.len() as f64, y.len() as f64);
    let (vx, vy) = (variance(x), variance(y));
    let diff = mean(x) - mean(y);

    let (se, dof) = if x.len() == y.len() {
        let pooled = ((nx - 1.0) * vx + (ny - 1.0) * vy) / (nx + ny - 2.0);
        ((pooled * (1.0 / nx + 1.0 / ny)).sqrt(), nx + ny - 2.0)
    } else {
        let (sx, sy) = (vx / nx, vy / ny);
        let denominator = sx * sx / (nx - 1.0) + sy * sy / (ny - 1.0);
        let dof = if denominator > 0.0 {
            (sx + sy).powi(2) / denominator
        } else {
            nx + ny - 2.0
        };
        ((sx + sy).sqrt(), dof)
    };

    let t = ratio(diff, se);
    Ok(TTest {
        t,
        dof,
        p: t_two_sided(t, dof)?,
    })
}

/// Standardized mean difference of `x` and `y`.
///
/// Paired samples are scaled by the average of the two variances,
/// independent samples by the pooled standard deviation. Hedges' g applies
/// the small-sample correction `1 - 3 / (4 (nx + ny) - 9)` to Cohen's d.
pub fn effect_size(x: &[f64], y: &[f64], paired: bool, kind: EffectSize) -> Option<f64> {
    let (nx, ny) = (x.len() as f64, y.len() as f64);
    let (vx, vy) = (variance(x), variance(y));
    let sd = if paired {
        ((vx + vy) / 2.0).sqrt()
    } else {
        (((nx - 1.0) * vx + (ny - 1.0) * vy) / (nx + ny - 2.0)).sqrt()
    };
    let d = ratio(mean(x) - mean(y), sd);
    match kind {
        EffectSize::None => None,
        EffectSize::Cohen => Some(d),
        EffectSize::Hedges => Some(d * (1.0 - 3.0 / (4.0 * (nx + ny) - 9.0))),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else if numerator == 0.0 {
        f64::NAN
    } else {
        numerator.signum() * f64::INFINITY
    }
}

struct Comparison {
    contrast: String,
    level: Option<String>,
    a: String,
    b: String,
    paired: bool,
    test: TTest,
    effect: Option<f64>,
    p_corr: f64,
}

fn pairs(count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count).flat_map(move |i| (i + 1..count).map(move |j| (i, j)))
}

fn correct_family(family: &mut [Comparison], options: &PosthocOptions) {
    let pvalues: Vec<f64> = family.iter().map(|c| c.test.p).collect();
    for (comparison, p_corr) in family
        .iter_mut()
        .zip(adjust_pvalues(&pvalues, options.correction))
    {
        comparison.p_corr = p_corr;
    }
}

/// Runs every contrast family of the design and assembles the result table.
///
/// Columns: `Contrast`, the within-factor level (mixed designs only), `A`,
/// `B`, `Paired`, `T`, `dof`, `alternative`, `p-unc`, `p-corr`, `p-adjust`
/// and the effect-size column named after the chosen effect size.
pub(crate) fn pairwise_table(
    matrix: &SubjectMatrix,
    design: &AnalysisDesign,
    options: &PosthocOptions,
) -> Result<DataFrame> {
    let within = &design.factors().within;
    let mut families: Vec<Vec<Comparison>> = Vec::new();

    let mut within_family = Vec::new();
    for (i, j) in pairs(matrix.n_levels()) {
        let x = matrix.level_values(i);
        let y = matrix.level_values(j);
        within_family.push(Comparison {
            contrast: within.clone(),
            level: None,
            a: matrix.levels[i].clone(),
            b: matrix.levels[j].clone(),
            paired: true,
            test: paired_ttest(&x, &y)?,
            effect: effect_size(&x, &y, true, options.effect_size),
            p_corr: f64::NAN,
        });
    }
    families.push(within_family);

    if let Some(between) = design.between() {
        let means = matrix.group_subject_means();
        let mut between_family = Vec::new();
        for (i, j) in pairs(matrix.groups.len()) {
            between_family.push(Comparison {
                contrast: between.to_string(),
                level: None,
                a: matrix.groups[i].clone(),
                b: matrix.groups[j].clone(),
                paired: false,
                test: independent_ttest(&means[i], &means[j])?,
                effect: effect_size(&means[i], &means[j], false, options.effect_size),
                p_corr: f64::NAN,
            });
        }
        families.push(between_family);

        let mut interaction_family = Vec::new();
        let contrast = format!("{within} * {between}");
        for level in 0..matrix.n_levels() {
            let grouped = matrix.group_level_values(level);
            for (i, j) in pairs(matrix.groups.len()) {
                interaction_family.push(Comparison {
                    contrast: contrast.clone(),
                    level: Some(matrix.levels[level].clone()),
                    a: matrix.groups[i].clone(),
                    b: matrix.groups[j].clone(),
                    paired: false,
                    test: independent_ttest(&grouped[i], &grouped[j])?,
                    effect: effect_size(&grouped[i], &grouped[j], false, options.effect_size),
                    p_corr: f64::NAN,
                });
            }
        }
        families.push(interaction_family);
    }

    for family in &mut families {
        correct_family(family, options);
    }
    let rows: Vec<Comparison> = families.into_iter().flatten().collect();

    tracing::debug!(
        contrasts = rows.len(),
        correction = %options.correction,
        "Computed pairwise comparisons"
    );

    build_table(&rows, design, options)
}

fn build_table(
    rows: &[Comparison],
    design: &AnalysisDesign,
    options: &PosthocOptions,
) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(12);
    columns.push(Column::new(
        "Contrast".into(),
        rows.iter().map(|r| r.contrast.as_str()).collect::<Vec<_>>(),
    ));
    if design.between().is_some() {
        columns.push(Column::new(
            design.factors().within.as_str().into(),
            rows.iter().map(|r| r.level.as_deref()).collect::<Vec<_>>(),
        ));
    }
    columns.push(Column::new(
        "A".into(),
        rows.iter().map(|r| r.a.as_str()).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "B".into(),
        rows.iter().map(|r| r.b.as_str()).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "Paired".into(),
        rows.iter().map(|r| r.paired).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "T".into(),
        rows.iter().map(|r| r.test.t).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "dof".into(),
        rows.iter().map(|r| r.test.dof).collect::<Vec<_>>(),
    ));
    columns.push(Column::new("alternative".into(), vec!["two-sided"; rows.len()]));
    columns.push(Column::new(
        "p-unc".into(),
        rows.iter().map(|r| r.test.p).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "p-corr".into(),
        rows.iter().map(|r| r.p_corr).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "p-adjust".into(),
        vec![options.correction.as_str(); rows.len()],
    ));
    if options.effect_size != EffectSize::None {
        columns.push(Column::new(
            options.effect_size.as_str().into(),
            rows.iter().map(|r| r.effect).collect::<Vec<_>>(),
        ));
    }
    Ok(DataFrame::new(columns)?)
}
