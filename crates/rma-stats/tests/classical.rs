//! Tests for the built-in statistics backend on long tables.

use polars::prelude::*;
use rma_model::{
    AnalysisDesign, ColumnSelector, CorrectionMethod, EffectSize, PosthocOptions, WithinFactors,
};
use rma_stats::{ClassicalBackend, INTERACTION_SOURCE, StatisticsBackend, StatsError};
use rma_transform::{ReshapeSpec, reshape_to_long};

fn close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

/// Long table of five subjects measured at T1..T3, within-major.
fn rm_long() -> DataFrame {
    let wide = [
        [10.0, 12.0, 15.0],
        [8.0, 11.0, 13.0],
        [9.0, 9.0, 13.0],
        [11.0, 14.0, 17.0],
        [7.0, 10.0, 12.0],
    ];
    let mut ids = Vec::new();
    let mut time = Vec::new();
    let mut score = Vec::new();
    for (level, label) in ["T1", "T2", "T3"].iter().enumerate() {
        for (subject, row) in wide.iter().enumerate() {
            ids.push(format!("P{}", subject + 1));
            time.push(*label);
            score.push(row[level]);
        }
    }
    DataFrame::new(vec![
        Column::new("PARTICIPANT".into(), ids),
        Column::new("time".into(), time),
        Column::new("score".into(), score),
    ])
    .unwrap()
}

/// Long table of seven subjects in two unequal groups.
fn mixed_long() -> DataFrame {
    let wide = [
        ("a", [5.0, 7.0, 9.0]),
        ("a", [6.0, 8.0, 9.0]),
        ("a", [4.0, 6.0, 10.0]),
        ("b", [6.0, 6.0, 7.0]),
        ("b", [7.0, 8.0, 8.0]),
        ("b", [5.0, 6.0, 6.0]),
        ("b", [6.0, 7.0, 9.0]),
    ];
    let mut ids = Vec::new();
    let mut time = Vec::new();
    let mut score = Vec::new();
    let mut group = Vec::new();
    for (level, label) in ["T1", "T2", "T3"].iter().enumerate() {
        for (subject, (g, row)) in wide.iter().enumerate() {
            ids.push(format!("P{}", subject + 1));
            time.push(*label);
            score.push(row[level]);
            group.push(*g);
        }
    }
    DataFrame::new(vec![
        Column::new("PARTICIPANT".into(), ids),
        Column::new("time".into(), time),
        Column::new("score".into(), score),
        Column::new("GROUP".into(), group),
    ])
    .unwrap()
}

fn factors() -> WithinFactors {
    WithinFactors::new("PARTICIPANT", "time", "score")
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().into_iter().collect()
}

#[test]
fn rm_anova_on_long_table() {
    let table = ClassicalBackend.rm_anova(&rm_long(), &factors(), true).unwrap();
    assert_eq!(
        strings(&table, "Source"),
        vec![Some("time".to_string()), Some("Error".to_string())]
    );
    close(floats(&table, "F")[0].unwrap(), 64.965_517_241_379);
    close(floats(&table, "SS")[1].unwrap(), 3.866_666_666_667);
}

#[test]
fn mixed_anova_reports_between_and_interaction() {
    let table = ClassicalBackend
        .mixed_anova(&mixed_long(), &factors(), "GROUP")
        .unwrap();
    let source = strings(&table, "Source");
    assert!(source.contains(&Some("GROUP".to_string())));
    assert!(source.contains(&Some(INTERACTION_SOURCE.to_string())));
    close(floats(&table, "F")[2].unwrap(), 6.548_872_180_451);
}

#[test]
fn pairwise_within_only_uses_bonferroni_by_default() {
    let design = AnalysisDesign::WithinOnly(factors());
    let table = ClassicalBackend
        .pairwise_tests(&rm_long(), &design, &PosthocOptions::default())
        .unwrap();

    assert_eq!(table.height(), 3);
    assert!(table.column("time").is_err());
    assert_eq!(
        strings(&table, "A"),
        vec![Some("T1".into()), Some("T1".into()), Some("T2".into())]
    );
    assert_eq!(
        strings(&table, "B"),
        vec![Some("T2".into()), Some("T3".into()), Some("T3".into())]
    );

    let p_corr = floats(&table, "p-corr");
    close(p_corr[0].unwrap(), 0.058_662_638_161);
    close(p_corr[1].unwrap(), 2.804_782_392e-4);
    close(p_corr[2].unwrap(), 0.005_115_472_454);

    let hedges = floats(&table, "hedges");
    close(hedges[0].unwrap(), -1.128_595_128_697);
    close(hedges[2].unwrap(), -1.288_914_187_378);
    assert_eq!(strings(&table, "p-adjust")[0].as_deref(), Some("bonf"));
}

#[test]
fn pairwise_mixed_has_three_families() {
    let design = AnalysisDesign::WithinBetween {
        factors: factors(),
        between: "GROUP".to_string(),
    };
    let options = PosthocOptions::new()
        .with_correction(CorrectionMethod::Holm)
        .with_effect_size(EffectSize::Cohen);
    let table = ClassicalBackend
        .pairwise_tests(&mixed_long(), &design, &options)
        .unwrap();

    assert_eq!(table.height(), 7);
    let contrast = strings(&table, "Contrast");
    assert_eq!(contrast[0].as_deref(), Some("time"));
    assert_eq!(contrast[3].as_deref(), Some("GROUP"));
    assert_eq!(contrast[4].as_deref(), Some("time * GROUP"));

    let level = strings(&table, "time");
    assert_eq!(level[3], None);
    assert_eq!(level[4].as_deref(), Some("T1"));
    assert_eq!(level[6].as_deref(), Some("T3"));

    let paired: Vec<Option<bool>> = table
        .column("Paired")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(paired[0], Some(true));
    assert_eq!(paired[3], Some(false));

    // a single between contrast is its own family: Holm leaves it unchanged
    let p_unc = floats(&table, "p-unc");
    let p_corr = floats(&table, "p-corr");
    close(p_unc[3].unwrap(), 0.538_323_691_979);
    assert_eq!(p_unc[3], p_corr[3]);
    assert!(table.column("cohen").is_ok());
}

#[test]
fn effect_size_none_omits_column() {
    let design = AnalysisDesign::WithinOnly(factors());
    let options = PosthocOptions::new().with_effect_size(EffectSize::None);
    let table = ClassicalBackend
        .pairwise_tests(&rm_long(), &design, &options)
        .unwrap();
    assert!(table.column("hedges").is_err());
    assert!(table.column("cohen").is_err());
}

#[test]
fn incomplete_subjects_are_dropped() {
    let mut long = rm_long();
    let mut score = floats(&long, "score");
    score[0] = None;
    long.with_column(Column::new("score".into(), score)).unwrap();

    let table = ClassicalBackend.rm_anova(&long, &factors(), true).unwrap();
    let df: Vec<Option<i64>> = table.column("DF").unwrap().i64().unwrap().into_iter().collect();
    // four complete subjects remain: error df = 3 * 2
    assert_eq!(df, vec![Some(2), Some(6)]);
}

#[test]
fn text_dependent_variable_is_rejected() {
    let long = DataFrame::new(vec![
        Column::new("PARTICIPANT".into(), vec!["P1", "P2", "P1", "P2"]),
        Column::new("time".into(), vec!["T1", "T1", "T2", "T2"]),
        Column::new("score".into(), vec!["1", "2", "3", "4"]),
    ])
    .unwrap();

    let err = ClassicalBackend.rm_anova(&long, &factors(), true).unwrap_err();
    assert!(matches!(err, StatsError::NonNumericDependent { .. }));
}

#[test]
fn too_few_subjects_is_rejected() {
    let long = DataFrame::new(vec![
        Column::new("PARTICIPANT".into(), vec!["P1", "P1"]),
        Column::new("time".into(), vec!["T1", "T2"]),
        Column::new("score".into(), vec![1.0, 2.0]),
    ])
    .unwrap();

    let err = ClassicalBackend.rm_anova(&long, &factors(), true).unwrap_err();
    assert!(matches!(err, StatsError::TooFewSubjects { found: 1, .. }));
}

#[test]
fn missing_between_column_is_reported() {
    let err = ClassicalBackend
        .mixed_anova(&rm_long(), &factors(), "GROUP")
        .unwrap_err();
    assert!(matches!(err, StatsError::ColumnNotFound { column } if column == "GROUP"));
}

#[test]
fn reshaped_long_table_feeds_every_routine() {
    let wide = DataFrame::new(vec![
        Column::new("PARTICIPANT".into(), vec!["P1", "P2", "P3", "P4", "P5"]),
        Column::new("T1".into(), vec![10.0, 8.0, 9.0, 11.0, 7.0]),
        Column::new("T2".into(), vec![12.0, 11.0, 9.0, 14.0, 10.0]),
        Column::new("T3".into(), vec![15.0, 13.0, 13.0, 17.0, 12.0]),
    ])
    .unwrap();
    let selector = ColumnSelector::explicit(["T1", "T2", "T3"]);
    let spec = ReshapeSpec {
        id_col: "PARTICIPANT",
        within: &selector,
        within_name: "time",
        dv_name: "score",
        between_col: None,
    };
    let long = reshape_to_long(&wide, &spec).unwrap().data;

    let anova = ClassicalBackend.rm_anova(&long, &factors(), true).unwrap();
    close(floats(&anova, "F")[0].unwrap(), 64.965_517_241_379);

    let design = AnalysisDesign::WithinOnly(factors());
    let posthoc = ClassicalBackend
        .pairwise_tests(&long, &design, &PosthocOptions::default())
        .unwrap();
    close(floats(&posthoc, "p-corr")[0].unwrap(), 0.058_662_638_161);
}

#[test]
fn multi_chunk_long_table_is_read_in_full() {
    let long = rm_long();
    let mut stacked = long.slice(0, 5);
    stacked.vstack_mut(&long.slice(5, 5)).unwrap();
    stacked.vstack_mut(&long.slice(10, 5)).unwrap();
    assert!(stacked.column("score").unwrap().as_materialized_series().n_chunks() > 1);

    let table = ClassicalBackend.rm_anova(&stacked, &factors(), true).unwrap();
    close(floats(&table, "F")[0].unwrap(), 64.965_517_241_379);
}
