use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the optional override file lives, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/pricing.json";

// ── Paths ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw customer/policy table read by the preparation stage.
    pub raw_data: PathBuf,
    /// Clean table written by preparation and read by pricing.
    pub clean_data: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_data:   PathBuf::from("data").join("data_synthetic.csv"),
            clean_data: PathBuf::from("outputs").join("clean_dataset.csv"),
        }
    }
}

// ── Preparation ────────────────────────────────────────────────────

/// What `claim_severity` becomes for a record with zero prior claims.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroClaimSeverity {
    /// Divide by 1 instead of 0: severity equals claim_history.
    #[default]
    GuardWithOne,
    /// Severity is 0 when there were no prior claims.
    Zero,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    pub zero_claim_severity: ZeroClaimSeverity,
}

// ── Pricing ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Target of the direct claim-cost regression.
    pub claim_amount_column: String,
    /// Used in place of `claim_amount_column` when the clean table lacks it.
    pub claim_amount_fallback: Option<String>,
    /// Rows shown in each console preview.
    pub preview_rows: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            claim_amount_column:   "claim_amount".into(),
            claim_amount_fallback: Some("claim_history".into()),
            preview_rows:          5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlmConfig {
    pub max_iter: usize,
    /// Absolute change in deviance below which IRLS stops.
    pub tol: f64,
}

impl Default for GlmConfig {
    fn default() -> Self {
        Self { max_iter: 100, tol: 1e-8 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_size: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { test_size: 0.2, seed: 42 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingConfig {
    pub num_boost_round: usize,
    pub learning_rate: f64,
    pub num_leaves: usize,
    pub min_data_in_leaf: usize,
    pub max_bin: usize,
    pub lambda_l2: f64,
    pub early_stopping_rounds: usize,
    /// Log validation RMSE every this many rounds (0 disables).
    pub log_every: usize,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            num_boost_round:       200,
            learning_rate:         0.05,
            num_leaves:            31,
            min_data_in_leaf:      20,
            max_bin:               255,
            lambda_l2:             0.0,
            early_stopping_rounds: 20,
            log_every:             50,
        }
    }
}

// ── Root ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths:    PathsConfig,
    pub prepare:  PrepareConfig,
    pub pricing:  PricingConfig,
    pub glm:      GlmConfig,
    pub split:    SplitConfig,
    pub boosting: BoostingConfig,
}

impl PipelineConfig {
    /// Load overrides from a JSON file. Fields absent from the file keep
    /// their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise the compiled-in defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            log::info!("config: loading overrides from {}", path.display());
            Self::load(path)
        } else {
            log::debug!("config: {} not present, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
