//! Pricing estimation stage: clean table → pure premium (frequency ×
//! severity GLMs) and direct claim-cost regression (boosted trees).
//!
//! The two estimates are independent; both read the same ModelFrame.

use crate::{
    config::{GlmConfig, PipelineConfig},
    encoding::ModelFrame,
    error::{PricingError, PricingResult},
    frame,
    gbm::GradientBoostedModel,
    glm::{Family, Glm, GlmFit},
    metrics::rmse,
    model::FittedModel,
    schema::{CLAIM_SEVERITY, HAS_CLAIM},
    split::{train_test_split, TrainTestSplit},
    types::RowIdx,
};
use ndarray::Array1;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PurePremiumEstimate {
    pub frequency:    GlmFit,
    pub severity:     GlmFit,
    pub pred_freq:    Array1<f64>,
    /// Predicted severity; 0 for records without a claim.
    pub pred_sev:     Array1<f64>,
    pub pure_premium: Array1<f64>,
}

#[derive(Debug)]
pub struct ClaimCostEstimate {
    pub model:  GradientBoostedModel,
    pub split:  TrainTestSplit,
    /// Test-set targets and predictions, in split order.
    pub y_true: Vec<f64>,
    pub y_pred: Vec<f64>,
    pub rmse:   f64,
}

#[derive(Debug)]
pub struct PricingReport {
    pub source:       PathBuf,
    pub frame:        ModelFrame,
    pub pure_premium: PurePremiumEstimate,
    pub claim_cost:   ClaimCostEstimate,
}

pub fn load_clean(path: &Path) -> PricingResult<DataFrame> {
    let clean = frame::read_csv(path)?;
    log::info!("pricing: loaded {} rows from {}", clean.height(), path.display());
    Ok(clean)
}

fn present_values(column: &str, values: &[Option<f64>], rows: &[RowIdx]) -> PricingResult<Vec<f64>> {
    rows.iter()
        .map(|&r| {
            values[r].ok_or_else(|| PricingError::InvalidValue {
                column: column.to_string(),
                row: r,
                value: "missing".into(),
            })
        })
        .collect()
}

/// Claim rows whose severity can enter a Gamma fit (present and
/// positive), and how many claim rows were left out.
fn severity_rows(frame: &ModelFrame, claim_rows: &[RowIdx]) -> (Vec<RowIdx>, usize) {
    let usable: Vec<RowIdx> = claim_rows
        .iter()
        .copied()
        .filter(|&r| frame.claim_severity[r].is_some_and(|s| s > 0.0))
        .collect();
    let dropped = claim_rows.len() - usable.len();
    (usable, dropped)
}

/// Frequency (Poisson) and severity (Gamma, claim rows with positive
/// severity only) GLMs and their product. Severity is predicted for
/// every claim row, including those left out of the fit.
pub fn estimate_pure_premium(frame: &ModelFrame, config: &GlmConfig) -> PricingResult<PurePremiumEstimate> {
    let x = frame.features.with_intercept();

    let frequency = Glm::new("frequency", HAS_CLAIM, Family::Poisson).fit(&x, &frame.has_claim, config)?;
    let pred_freq = frequency.predict(&x)?;

    let claim_rows = frame.claim_rows();
    let (fit_rows, dropped) = severity_rows(frame, &claim_rows);
    if dropped > 0 {
        log::warn!(
            "pricing: {dropped} of {} claim rows have no positive {CLAIM_SEVERITY}, left out of the severity fit",
            claim_rows.len()
        );
    }
    if fit_rows.is_empty() {
        return Err(PricingError::EmptySubset { model: "severity".into() });
    }
    let y_sev = Array1::from(present_values(CLAIM_SEVERITY, &frame.claim_severity, &fit_rows)?);
    let severity = Glm::new("severity", CLAIM_SEVERITY, Family::Gamma)
        .fit(&x.take_rows(&fit_rows), &y_sev, config)?;
    let sev_on_claims = severity.predict(&x.take_rows(&claim_rows))?;

    let mut pred_sev = Array1::<f64>::zeros(frame.n_rows());
    for (&row, &s) in claim_rows.iter().zip(sev_on_claims.iter()) {
        pred_sev[row] = s;
    }
    let pure_premium = &pred_freq * &pred_sev;

    log::info!(
        "pricing: pure premium for {} records ({} with claims), mean {:.4}",
        frame.n_rows(),
        claim_rows.len(),
        pure_premium.mean().unwrap_or(f64::NAN)
    );

    Ok(PurePremiumEstimate { frequency, severity, pred_freq, pred_sev, pure_premium })
}

/// Boosted trees on claim amount with a seeded hold-out split.
pub fn estimate_claim_cost(frame: &ModelFrame, config: &PipelineConfig) -> PricingResult<ClaimCostEstimate> {
    let split = train_test_split(frame.n_rows(), config.split.test_size, config.split.seed)?;
    let source = frame.claim_amount_source.as_str();

    let x_train = frame.features.take_rows(&split.train);
    let x_test = frame.features.take_rows(&split.test);
    let y_train = present_values(source, &frame.claim_amount, &split.train)?;
    let y_test = present_values(source, &frame.claim_amount, &split.test)?;

    let model = GradientBoostedModel::train(&config.boosting, &x_train, &y_train, &x_test, &y_test)?;
    let y_pred = model.predict(&x_test)?.to_vec();
    let score = rmse(&y_test, &y_pred)?;
    log::info!("pricing: claim cost rmse {score:.4} over {} test rows", y_test.len());

    Ok(ClaimCostEstimate { model, split, y_true: y_test, y_pred, rmse: score })
}

pub fn run_pricing(config: &PipelineConfig) -> PricingResult<PricingReport> {
    let clean = load_clean(&config.paths.clean_data)?;
    let frame = ModelFrame::from_clean(&clean, &config.pricing)?;
    let pure_premium = estimate_pure_premium(&frame, &config.glm)?;
    let claim_cost = estimate_claim_cost(&frame, config)?;
    Ok(PricingReport {
        source: config.paths.clean_data.clone(),
        frame,
        pure_premium,
        claim_cost,
    })
}
