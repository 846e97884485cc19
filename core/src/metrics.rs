//! Regression metrics.

use crate::error::{PricingError, PricingResult};

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> PricingResult<()> {
    if y_true.len() != y_pred.len() {
        return Err(PricingError::Other(anyhow::anyhow!(
            "metric inputs differ in length: {} targets, {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

/// Mean squared error; NaN for empty inputs.
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> PricingResult<f64> {
    check_lengths(y_true, y_pred)?;
    if y_true.is_empty() {
        return Ok(f64::NAN);
    }
    let sse: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    Ok(sse / y_true.len() as f64)
}

/// Root mean squared error, never negative.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> PricingResult<f64> {
    Ok(mean_squared_error(y_true, y_pred)?.sqrt())
}
