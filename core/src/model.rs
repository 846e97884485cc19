//! Model trait.
//!
//! RULE: The pricing stage only talks to fitted models through
//! FittedModel. Fitting lives on each model type; once fitted, a model
//! is read-only and is dropped at the end of the run.

use crate::{encoding::DesignMatrix, error::PricingResult};
use ndarray::Array1;

/// The contract every fitted model must fulfill.
pub trait FittedModel {
    /// Short stable name used in logs and errors.
    fn name(&self) -> &str;

    /// Predictions for every row of `x`. `x` must have the column layout
    /// the model was fitted on.
    fn predict(&self, x: &DesignMatrix) -> PricingResult<Array1<f64>>;

    /// Human-readable report of the fit.
    fn summary(&self) -> String;
}

/// Fail unless `x` has exactly the columns `expected`, in order.
pub(crate) fn check_layout(model: &str, expected: &[String], x: &DesignMatrix) -> PricingResult<()> {
    if x.names != expected {
        return Err(anyhow::anyhow!(
            "model '{model}' was fitted on {} columns {:?}, got {} columns {:?}",
            expected.len(),
            expected,
            x.names.len(),
            x.names
        )
        .into());
    }
    Ok(())
}
