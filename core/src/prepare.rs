//! Data preparation stage: raw customer table → clean table.
//!
//! Steps run in a fixed order, each taking the previous table by
//! reference and returning a new one:
//!   1. load_raw
//!   2. select_source_columns
//!   3. rename_columns
//!   4. derive_fields
//!   5. fill_missing
//!   6. write_clean

use crate::{
    config::{PipelineConfig, PrepareConfig, ZeroClaimSeverity},
    error::{PricingError, PricingResult},
    frame::{self, f64_values, labels, series},
    schema::{self, CLAIM_FREQUENCY, CLAIM_HISTORY, CLAIM_SEVERITY, CREDIT_SCORE, HAS_CLAIM,
             LOSS_RATIO, PREMIUM_AMOUNT, PREV_CLAIMS, UNKNOWN, UNKNOWN_FILLED},
};
use polars::prelude::*;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Cells filled by `fill_missing`, per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub filled: Vec<(String, usize)>,
    /// Median used for credit_score; None when the column had nothing to fill.
    pub credit_score_median: Option<f64>,
}

impl FillReport {
    pub fn total(&self) -> usize {
        self.filled.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Debug, Clone)]
pub struct PreparationSummary {
    pub rows:        usize,
    pub columns:     usize,
    pub output_path: PathBuf,
    pub fills:       FillReport,
}

pub fn load_raw(path: &Path) -> PricingResult<DataFrame> {
    let df = frame::read_csv(path)?;
    log::info!(
        "prepare: loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

pub fn select_source_columns(raw: &DataFrame) -> PricingResult<DataFrame> {
    let names = schema::source_names();
    frame::require_columns(raw, &names)?;
    Ok(raw.select(names)?)
}

pub fn rename_columns(selected: &DataFrame) -> PricingResult<DataFrame> {
    let mut renamed = selected.clone();
    for (from, to) in schema::SOURCE_COLUMNS {
        renamed.rename(from, to.into())?;
    }
    Ok(renamed)
}

/// claim_history > 0; a missing amount counts as no claim.
fn has_claim(claim_history: Option<f64>) -> i64 {
    match claim_history {
        Some(x) if x > 0.0 => 1,
        _ => 0,
    }
}

/// Divide, substituting 1 for a zero denominator. Missing operands
/// propagate.
fn guarded_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    Some(if d == 0.0 { n } else { n / d })
}

/// Add has_claim, claim_frequency, claim_severity and loss_ratio.
pub fn derive_fields(renamed: &DataFrame, config: &PrepareConfig) -> PricingResult<DataFrame> {
    let history = f64_values(series(renamed, CLAIM_HISTORY)?)?;
    let premium = f64_values(series(renamed, PREMIUM_AMOUNT)?)?;

    let has_claim_col: Vec<i64> = history.iter().map(|&h| has_claim(h)).collect();

    // Keeps the source dtype: integer counts stay integers.
    let frequency_col = series(renamed, PREV_CLAIMS)?
        .fill_null(FillNullStrategy::Zero)?
        .with_name(CLAIM_FREQUENCY.into());
    let frequency = f64_values(&frequency_col)?;

    let severity: Vec<Option<f64>> = history
        .iter()
        .zip(&frequency)
        .map(|(&h, &f)| match config.zero_claim_severity {
            ZeroClaimSeverity::Zero if f == Some(0.0) => h.map(|_| 0.0),
            _ => guarded_ratio(h, f),
        })
        .collect();

    let loss_ratio: Vec<Option<f64>> = history
        .iter()
        .zip(&premium)
        .map(|(&h, &p)| guarded_ratio(h, p))
        .collect();

    let mut derived = renamed.clone();
    derived.with_column(Series::new(HAS_CLAIM.into(), has_claim_col))?;
    derived.with_column(frequency_col)?;
    derived.with_column(Series::new(CLAIM_SEVERITY.into(), severity))?;
    derived.with_column(Series::new(LOSS_RATIO.into(), loss_ratio))?;
    Ok(derived)
}

fn fill_unknown(column: &Series) -> PricingResult<Series> {
    let values: Vec<String> = labels(column)?
        .into_iter()
        .map(|v| v.unwrap_or_else(|| UNKNOWN.to_string()))
        .collect();
    Ok(Series::new(column.name().clone(), values))
}

/// Fill the four text columns with "Unknown" and credit_score with its
/// median. Other columns keep their missing cells.
pub fn fill_missing(derived: &DataFrame) -> PricingResult<(DataFrame, FillReport)> {
    let mut df = derived.clone();
    let mut report = FillReport::default();

    for name in UNKNOWN_FILLED {
        let column = series(derived, name)?;
        let missing = column.null_count();
        if missing > 0 {
            df.with_column(fill_unknown(column)?)?;
            report.filled.push((name.to_string(), missing));
        }
    }

    let credit = series(derived, CREDIT_SCORE)?;
    let missing = credit.null_count();
    if missing > 0 {
        let credit = credit.cast(&DataType::Float64)?;
        let values = credit.f64()?;
        match values.median() {
            Some(m) => {
                let filled = values.fill_null_with_values(m)?;
                df.with_column(filled.into_series())?;
                report.filled.push((CREDIT_SCORE.to_string(), missing));
                report.credit_score_median = Some(m);
            }
            None => log::warn!("prepare: credit_score has no values, median fill skipped"),
        }
    }

    Ok((df, report))
}

/// Steps 2–5 over an already loaded raw table.
pub fn prepare_table(raw: &DataFrame, config: &PrepareConfig) -> PricingResult<(DataFrame, FillReport)> {
    let selected = select_source_columns(raw)?;
    let renamed = rename_columns(&selected)?;
    let derived = derive_fields(&renamed, config)?;
    let (clean, report) = fill_missing(&derived)?;
    for (column, n) in &report.filled {
        log::debug!("prepare: filled {n} missing cells in {column}");
    }
    Ok((clean, report))
}

/// Write `clean` to `path`, creating the parent directory if needed and
/// replacing any previous file.
pub fn write_clean(clean: &DataFrame, path: &Path) -> PricingResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(path)?;
    frame::write_csv(clean, BufWriter::new(file))?;
    log::info!("prepare: wrote {} rows to {}", clean.height(), path.display());
    Ok(())
}

pub fn prepare_data(config: &PipelineConfig) -> PricingResult<PreparationSummary> {
    let raw = load_raw(&config.paths.raw_data)?;
    let (clean, fills) = prepare_table(&raw, &config.prepare)?;

    let expected = schema::clean_columns();
    if frame::column_names(&clean) != expected {
        return Err(PricingError::Other(anyhow::anyhow!(
            "clean table columns {:?} do not match {:?}",
            frame::column_names(&clean),
            expected
        )));
    }

    write_clean(&clean, &config.paths.clean_data)?;
    Ok(PreparationSummary {
        rows:        clean.height(),
        columns:     clean.width(),
        output_path: config.paths.clean_data.clone(),
        fills,
    })
}
