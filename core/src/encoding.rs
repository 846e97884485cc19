//! Model inputs: one-hot encoding and the design matrix shared by the
//! GLMs and the boosted trees.

use crate::{
    config::PricingConfig,
    error::{PricingError, PricingResult},
    frame::{f64_values, has_column, labels, series},
    schema::{CATEGORICAL_FEATURES, CLAIM_SEVERITY, CUSTOMER_ID, HAS_CLAIM, INTERCEPT, NUMERIC_FEATURES},
    types::{CustomerId, RowIdx},
};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::{DataFrame, DataType, Series};

/// A dense, named, row-major feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    pub names:  Vec<String>,
    pub values: Array2<f64>,
}

impl DesignMatrix {
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Prepend a constant column of ones named `const`.
    pub fn with_intercept(&self) -> Self {
        let mut values = Array2::ones((self.n_rows(), self.n_cols() + 1));
        values.slice_mut(ndarray::s![.., 1..]).assign(&self.values);
        let mut names = Vec::with_capacity(self.names.len() + 1);
        names.push(INTERCEPT.to_string());
        names.extend(self.names.iter().cloned());
        Self { names, values }
    }

    pub fn take_rows(&self, rows: &[RowIdx]) -> Self {
        Self {
            names:  self.names.clone(),
            values: self.values.select(Axis(0), rows),
        }
    }
}

/// The sorted levels of one categorical column. The first level is the
/// reference and gets no dummy column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalLevels {
    pub column: String,
    pub levels: Vec<String>,
}

impl CategoricalLevels {
    pub fn fit(column: &Series) -> PricingResult<Self> {
        let keys = if column.dtype() == &DataType::String {
            vec![None; column.len()]
        } else {
            f64_values(column)?
        };
        let mut labelled: Vec<(Option<f64>, String)> = keys
            .into_iter()
            .zip(labels(column)?)
            .filter_map(|(k, l)| l.map(|l| (k, l)))
            .collect();
        // Numeric codes sort by value, text sorts lexicographically.
        labelled.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.1.cmp(&b.1),
        });
        let mut levels: Vec<String> = labelled.into_iter().map(|(_, l)| l).collect();
        levels.dedup();
        Ok(Self { column: column.name().to_string(), levels })
    }

    pub fn reference(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }

    /// Levels that get an indicator column.
    pub fn encoded(&self) -> &[String] {
        self.levels.get(1..).unwrap_or(&[])
    }

    pub fn dummy_names(&self) -> Vec<String> {
        self.encoded().iter().map(|l| format!("{}_{l}", self.column)).collect()
    }

    /// Indicator columns for `column`. A missing cell is all zeros.
    fn encode(&self, column: &Series) -> PricingResult<Array2<f64>> {
        let encoded = self.encoded();
        let cells = labels(column)?;
        let mut out = Array2::zeros((cells.len(), encoded.len()));
        for (row, cell) in cells.iter().enumerate() {
            if let Some(j) = cell.as_ref().and_then(|c| encoded.iter().position(|l| l == c)) {
                out[[row, j]] = 1.0;
            }
        }
        Ok(out)
    }
}

/// Numeric predictors first, then the dummies of each categorical.
pub fn encode_features(
    df: &DataFrame,
    numeric: &[&str],
    categorical: &[&str],
) -> PricingResult<(DesignMatrix, Vec<CategoricalLevels>)> {
    let n = df.height();
    let mut names = Vec::new();
    let mut blocks: Vec<Array2<f64>> = Vec::new();

    for &name in numeric {
        let values = f64_values(series(df, name)?)?;
        let mut block = Array2::zeros((n, 1));
        for (row, v) in values.iter().enumerate() {
            block[[row, 0]] = require_finite(name, row, *v)?;
        }
        names.push(name.to_string());
        blocks.push(block);
    }

    let mut fitted = Vec::with_capacity(categorical.len());
    for &name in categorical {
        let column = series(df, name)?;
        let levels = CategoricalLevels::fit(column)?;
        names.extend(levels.dummy_names());
        blocks.push(levels.encode(column)?);
        fitted.push(levels);
    }

    let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
    let values = if views.is_empty() {
        Array2::zeros((n, 0))
    } else {
        ndarray::concatenate(Axis(1), &views)
            .map_err(|e| PricingError::Other(anyhow::anyhow!("design matrix: {e}")))?
    };
    Ok((DesignMatrix { names, values }, fitted))
}

fn require_finite(column: &str, row: RowIdx, value: Option<f64>) -> PricingResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        other => Err(PricingError::InvalidValue {
            column: column.to_string(),
            row,
            value: other.map(|v| v.to_string()).unwrap_or_else(|| "missing".into()),
        }),
    }
}

/// The clean table reduced to what the pricing models consume.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    pub customer_ids:   Vec<Option<CustomerId>>,
    pub features:       DesignMatrix,
    pub levels:         Vec<CategoricalLevels>,
    pub has_claim:      Array1<f64>,
    pub claim_severity: Vec<Option<f64>>,
    pub claim_amount:   Vec<Option<f64>>,
    /// Column the claim amounts were read from.
    pub claim_amount_source: String,
}

impl ModelFrame {
    pub fn from_clean(clean: &DataFrame, config: &PricingConfig) -> PricingResult<Self> {
        let (features, levels) = encode_features(clean, &NUMERIC_FEATURES, &CATEGORICAL_FEATURES)?;

        let has_claim = f64_values(series(clean, HAS_CLAIM)?)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| require_finite(HAS_CLAIM, row, v))
            .collect::<PricingResult<Vec<_>>>()?;

        let claim_severity = f64_values(series(clean, CLAIM_SEVERITY)?)?;

        let claim_amount_source = resolve_claim_amount(clean, config)?;
        let claim_amount = f64_values(series(clean, &claim_amount_source)?)?;

        let customer_ids = if has_column(clean, CUSTOMER_ID) {
            labels(series(clean, CUSTOMER_ID)?)?
        } else {
            vec![None; clean.height()]
        };

        log::info!(
            "encoding: {} rows, {} predictors ({} dummies)",
            features.n_rows(),
            features.n_cols(),
            features.n_cols() - NUMERIC_FEATURES.len()
        );

        Ok(Self {
            customer_ids,
            features,
            levels,
            has_claim: Array1::from(has_claim),
            claim_severity,
            claim_amount,
            claim_amount_source,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.features.n_rows()
    }

    /// Rows with at least one claim, in table order.
    pub fn claim_rows(&self) -> Vec<RowIdx> {
        self.has_claim
            .iter()
            .enumerate()
            .filter(|&(_, &h)| h == 1.0)
            .map(|(i, _)| i)
            .collect()
    }
}

fn resolve_claim_amount(clean: &DataFrame, config: &PricingConfig) -> PricingResult<String> {
    if has_column(clean, &config.claim_amount_column) {
        return Ok(config.claim_amount_column.clone());
    }
    match &config.claim_amount_fallback {
        Some(fallback) if has_column(clean, fallback) => {
            log::warn!(
                "encoding: '{}' not in clean table, using '{fallback}' as claim amount",
                config.claim_amount_column
            );
            Ok(fallback.clone())
        }
        _ => Err(PricingError::MissingColumn { column: config.claim_amount_column.clone() }),
    }
}
