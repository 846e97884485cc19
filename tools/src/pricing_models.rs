//! pricing-models: pure premium and claim-cost estimates from the clean
//! dataset.
//!
//! Usage:
//!   pricing-models
//!
//! Reads the clean dataset written by prepare-data. Set RUST_LOG=info to
//! follow GLM iterations and boosting progress.

use anyhow::Result;
use premium_core::{
    config::{PipelineConfig, DEFAULT_CONFIG_PATH},
    model::FittedModel,
    pricing::{run_pricing, PricingReport},
    report::{ClaimCostPreview, PurePremiumPreview},
};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let config = PipelineConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?;
    let report = run_pricing(&config)?;
    print_report(&report, config.pricing.preview_rows);
    Ok(())
}

fn print_report(report: &PricingReport, preview_rows: usize) {
    let pp = &report.pure_premium;
    let cc = &report.claim_cost;

    println!("CSV loaded from: {}", report.source.display());

    println!();
    println!("=== APPROACH 1: PURE PREMIUM ===");
    println!();
    println!("--- Frequency (Poisson GLM) ---");
    println!("{}", pp.frequency.summary());
    println!();
    println!("--- Severity (Gamma GLM) ---");
    println!("{}", pp.severity.summary());
    println!();
    println!("Pure premium, first {preview_rows} customers:");
    print!("{}", PurePremiumPreview { frame: &report.frame, estimate: pp, rows: preview_rows });

    println!();
    println!("=== APPROACH 2: DIRECT CLAIM COST ===");
    println!("  target:   {}", report.frame.claim_amount_source);
    println!("  train:    {} rows", cc.split.train.len());
    println!("  test:     {} rows", cc.split.test.len());
    println!();
    println!("{}", cc.model.summary());
    println!();
    println!("Claim cost RMSE (gradient boosting): {:.2}", cc.rmse);
    println!();
    println!("Claim cost predictions, first {preview_rows} test customers:");
    print!("{}", ClaimCostPreview { estimate: cc, rows: preview_rows });
}
