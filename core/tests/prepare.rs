//! Data preparation: projection, renaming, derived fields, missing-value
//! fills and the clean file on disk.

mod common;

use common::{raw_csv, raw_headers, raw_table, scratch_dir, RawRow};
use premium_core::{
    config::{PipelineConfig, PrepareConfig, ZeroClaimSeverity},
    error::PricingError,
    prepare::{fill_missing, prepare_data, prepare_table},
    frame::{self, f64_at, labels, series},
    schema,
};
use polars::prelude::{Column, DataFrame, Series};

fn prepare(rows: &[RawRow]) -> DataFrame {
    prepare_table(&raw_table(rows), &PrepareConfig::default())
        .expect("prepare")
        .0
}

fn value(df: &DataFrame, column: &str, row: usize) -> Option<f64> {
    f64_at(df, column, row).unwrap()
}

fn label(df: &DataFrame, column: &str, row: usize) -> Option<String> {
    labels(series(df, column).unwrap()).unwrap()[row].clone()
}

fn is_missing(df: &DataFrame, column: &str, row: usize) -> bool {
    series(df, column).unwrap().get(row).unwrap().is_null()
}

#[test]
fn output_has_exactly_the_clean_columns_in_order() {
    let clean = prepare(&[RawRow::new(1)]);
    assert_eq!(frame::column_names(&clean), schema::clean_columns());
    assert_eq!(clean.width(), 21);
}

#[test]
fn output_order_ignores_input_column_order() {
    let mut headers = raw_headers();
    headers.reverse();
    let csv = raw_csv(&headers, &[RawRow::new(1), RawRow::new(2)]);
    let raw = frame::read_csv_text(&csv).unwrap();
    let (clean, _) = prepare_table(&raw, &PrepareConfig::default()).unwrap();
    assert_eq!(frame::column_names(&clean), schema::clean_columns());
    assert_eq!(label(&clean, "customer_id", 1).as_deref(), Some("2"));
}

#[test]
fn no_claim_record_example() {
    // claim_history=0, prev_claims=0 → has_claim 0, severity 0/1 = 0.
    let clean = prepare(&[RawRow::new(1)]);
    assert_eq!(value(&clean, "has_claim", 0), Some(0.0));
    assert_eq!(value(&clean, "claim_frequency", 0), Some(0.0));
    assert_eq!(value(&clean, "claim_severity", 0), Some(0.0));
    assert_eq!(value(&clean, "loss_ratio", 0), Some(0.0));
}

#[test]
fn claim_with_zero_prior_claims_uses_guard() {
    // claim_history=500, prev_claims=0, premium=1000.
    let row = RawRow { claim_history: Some(500.0), ..RawRow::new(1) };
    let clean = prepare(&[row]);
    assert_eq!(value(&clean, "has_claim", 0), Some(1.0));
    assert_eq!(value(&clean, "claim_frequency", 0), Some(0.0));
    assert_eq!(value(&clean, "claim_severity", 0), Some(500.0));
    assert_eq!(value(&clean, "loss_ratio", 0), Some(0.5));
}

#[test]
fn severity_divides_by_prior_claims() {
    let row = RawRow { claim_history: Some(900.0), prev_claims: Some(3), ..RawRow::new(1) };
    let clean = prepare(&[row]);
    assert_eq!(value(&clean, "claim_frequency", 0), Some(3.0));
    assert_eq!(value(&clean, "claim_severity", 0), Some(300.0));
}

#[test]
fn has_claim_iff_positive_history() {
    let rows: Vec<RawRow> = [0.0, 0.01, 250.0, -5.0]
        .iter()
        .enumerate()
        .map(|(i, &h)| RawRow { claim_history: Some(h), ..RawRow::new(i as i64) })
        .collect();
    let clean = prepare(&rows);
    let flags: Vec<_> = (0..4).map(|r| value(&clean, "has_claim", r)).collect();
    assert_eq!(flags, vec![Some(0.0), Some(1.0), Some(1.0), Some(0.0)]);
}

#[test]
fn zero_premium_is_guarded_in_loss_ratio() {
    let row = RawRow { claim_history: Some(120.0), premium_amount: Some(0.0), ..RawRow::new(1) };
    let clean = prepare(&[row]);
    assert_eq!(value(&clean, "loss_ratio", 0), Some(120.0));
}

#[test]
fn missing_prior_claims_count_as_zero() {
    let rows = [
        RawRow { claim_history: Some(400.0), prev_claims: None, ..RawRow::new(1) },
        RawRow { claim_history: Some(400.0), prev_claims: Some(2), ..RawRow::new(2) },
    ];
    let clean = prepare(&rows);
    assert_eq!(value(&clean, "claim_frequency", 0), Some(0.0));
    assert_eq!(value(&clean, "claim_severity", 0), Some(400.0));
    assert_eq!(value(&clean, "claim_severity", 1), Some(200.0));
    // The source column keeps its gap.
    assert!(is_missing(&clean, "prev_claims", 0));
}

#[test]
fn zero_severity_option_maps_no_prior_claims_to_zero() {
    let row = RawRow { claim_history: Some(500.0), ..RawRow::new(1) };
    let config = PrepareConfig { zero_claim_severity: ZeroClaimSeverity::Zero };
    let (clean, _) = prepare_table(&raw_table(&[row]), &config).unwrap();
    assert_eq!(value(&clean, "claim_severity", 0), Some(0.0));
    // loss_ratio keeps the usual guard.
    assert_eq!(value(&clean, "loss_ratio", 0), Some(0.5));
}

#[test]
fn missing_text_fields_become_unknown() {
    let row = RawRow {
        occupation: None,
        education_level: None,
        geo_info: None,
        location: None,
        ..RawRow::new(1)
    };
    let keep = RawRow::new(2);
    let clean = prepare(&[row, keep]);
    for column in schema::UNKNOWN_FILLED {
        assert_eq!(label(&clean, column, 0).as_deref(), Some("Unknown"), "{column}");
        assert_ne!(label(&clean, column, 1).as_deref(), Some("Unknown"), "{column}");
    }
}

#[test]
fn missing_credit_score_becomes_median() {
    let rows = [
        RawRow { credit_score: Some(600), ..RawRow::new(1) },
        RawRow { credit_score: None, ..RawRow::new(2) },
        RawRow { credit_score: Some(700), ..RawRow::new(3) },
        RawRow { credit_score: Some(800), ..RawRow::new(4) },
        RawRow { credit_score: Some(650), ..RawRow::new(5) },
    ];
    let (clean, report) = prepare_table(&raw_table(&rows), &PrepareConfig::default()).unwrap();
    // median of 600, 650, 700, 800
    assert_eq!(value(&clean, "credit_score", 1), Some(675.0));
    assert_eq!(report.credit_score_median, Some(675.0));
    assert_eq!(value(&clean, "credit_score", 0), Some(600.0));
}

#[test]
fn other_missing_values_are_left_alone() {
    let row = RawRow { claim_history: None, ..RawRow::new(1) };
    let clean = prepare(&[row]);
    assert!(is_missing(&clean, "claim_history", 0));
    assert_eq!(value(&clean, "has_claim", 0), Some(0.0));
    assert!(is_missing(&clean, "claim_severity", 0));
    assert!(is_missing(&clean, "loss_ratio", 0));
}

#[test]
fn fill_report_counts_cells() {
    let columns: Vec<Column> = vec![
        Series::new("occupation".into(), &[None, Some("Doctor"), None]).into(),
        Series::new("education_level".into(), &["PhD"; 3]).into(),
        Series::new("geo_info".into(), &["Goa"; 3]).into(),
        Series::new("location".into(), &["1"; 3]).into(),
        Series::new("credit_score".into(), &[Some(1.0), None, Some(3.0)]).into(),
    ];
    let df = DataFrame::new(columns).unwrap();
    let (filled, report) = fill_missing(&df).unwrap();
    assert_eq!(report.filled, vec![("occupation".to_string(), 2), ("credit_score".to_string(), 1)]);
    assert_eq!(report.total(), 3);
    assert_eq!(report.credit_score_median, Some(2.0));
    assert_eq!(value(&filled, "credit_score", 1), Some(2.0));
    assert_eq!(label(&filled, "occupation", 2).as_deref(), Some("Unknown"));
}

#[test]
fn absent_source_column_is_a_schema_error() {
    let headers: Vec<&str> = raw_headers().into_iter().filter(|h| *h != "Deductible").collect();
    let raw = frame::read_csv_text(&raw_csv(&headers, &[RawRow::new(1)])).unwrap();
    match prepare_table(&raw, &PrepareConfig::default()) {
        Err(PricingError::MissingColumn { column }) => assert_eq!(column, "Deductible"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn missing_raw_file_names_the_path() {
    let dir = scratch_dir("no-raw");
    let mut config = PipelineConfig::default();
    config.paths.raw_data = dir.join("absent.csv");
    config.paths.clean_data = dir.join("out").join("clean.csv");

    match prepare_data(&config) {
        Err(PricingError::MissingInput { path }) => assert!(path.ends_with("absent.csv"), "{path}"),
        other => panic!("expected MissingInput, got {other:?}"),
    }
    assert!(!config.paths.clean_data.exists(), "no output on failure");
}

#[test]
fn prepare_data_writes_and_overwrites_clean_file() {
    let dir = scratch_dir("write-clean");
    std::fs::create_dir_all(&dir).unwrap();
    let raw_path = dir.join("raw.csv");
    let mut config = PipelineConfig::default();
    config.paths.raw_data = raw_path.clone();
    config.paths.clean_data = dir.join("outputs").join("clean_dataset.csv");

    let rows = [
        RawRow { claim_history: Some(500.0), ..RawRow::new(1) },
        RawRow::new(2),
        RawRow::new(3),
    ];
    std::fs::write(&raw_path, raw_csv(&raw_headers(), &rows)).unwrap();
    let first = prepare_data(&config).unwrap();
    assert_eq!(first.rows, 3);
    assert_eq!(first.columns, 21);

    // Second run with fewer rows replaces the file entirely.
    std::fs::write(&raw_path, raw_csv(&raw_headers(), &rows[..1])).unwrap();
    prepare_data(&config).unwrap();

    let written = std::fs::read_to_string(&config.paths.clean_data).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2, "header plus one record:\n{written}");
    assert_eq!(lines[0], schema::clean_columns().join(","));
    assert!(lines[1].ends_with(",1,0,500.0,0.5"), "derived tail: {}", lines[1]);

    let reread = frame::read_csv(&config.paths.clean_data).unwrap();
    assert_eq!(frame::column_names(&reread), schema::clean_columns());

    let _ = std::fs::remove_dir_all(&dir);
}
