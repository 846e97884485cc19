use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data frame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Booster error: {0}")]
    Booster(#[from] xgboost::XGBError),

    #[error("File not found: {path}")]
    MissingInput { path: String },

    #[error("Column '{column}' not found")]
    MissingColumn { column: String },

    #[error("Invalid value in column '{column}' at row {row}: {value}")]
    InvalidValue { column: String, row: usize, value: String },

    #[error("Model '{model}' has no rows to fit")]
    EmptySubset { model: String },

    #[error("Model '{model}': design matrix is singular")]
    SingularDesign { model: String },

    #[error("Model '{model}' did not converge after {iterations} iterations")]
    NonConvergence { model: String, iterations: usize },

    #[error("Cannot split {n_rows} rows with test_size={test_size}: one side is empty")]
    EmptySplit { n_rows: usize, test_size: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PricingResult<T> = Result<T, PricingError>;
