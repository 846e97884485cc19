//! Console previews of pricing results.

use crate::{
    encoding::ModelFrame,
    pricing::{ClaimCostEstimate, PurePremiumEstimate},
};
use std::fmt;

/// First `rows` records: predicted frequency, severity and pure premium.
pub struct PurePremiumPreview<'a> {
    pub frame:    &'a ModelFrame,
    pub estimate: &'a PurePremiumEstimate,
    pub rows:     usize,
}

impl fmt::Display for PurePremiumPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>5} {:>12} {:>14} {:>14} {:>14}",
            "row", "customer_id", "pred_freq", "pred_sev", "pure_premium"
        )?;
        let est = self.estimate;
        for row in 0..self.rows.min(self.frame.n_rows()) {
            let id = self.frame.customer_ids[row].as_deref().unwrap_or("-");
            writeln!(
                f,
                "{row:>5} {id:>12} {:>14.6} {:>14.6} {:>14.6}",
                est.pred_freq[row], est.pred_sev[row], est.pure_premium[row]
            )?;
        }
        Ok(())
    }
}

/// First `rows` test records: true vs predicted claim amount.
pub struct ClaimCostPreview<'a> {
    pub estimate: &'a ClaimCostEstimate,
    pub rows:     usize,
}

impl fmt::Display for ClaimCostPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>5} {:>14} {:>14}", "", "y_true", "y_pred")?;
        let est = self.estimate;
        for (i, (t, p)) in est.y_true.iter().zip(&est.y_pred).take(self.rows).enumerate() {
            writeln!(f, "{i:>5} {t:>14.6} {p:>14.6}")?;
        }
        Ok(())
    }
}
