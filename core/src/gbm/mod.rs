//! Gradient-boosted regression trees (xgboost) with a squared-error
//! objective and early stopping on a validation set.
//!
//! RULE: Predictions always come from the best validation round. When
//! training ran past it, the booster is refitted for exactly that many
//! rounds; training is deterministic, so the refit reproduces those
//! trees.

mod params;

use crate::{
    config::BoostingConfig,
    encoding::DesignMatrix,
    error::{PricingError, PricingResult},
    metrics::rmse,
    model::{check_layout, FittedModel},
    stats::mean,
};
use ndarray::Array1;
use params::booster_parameters;
use std::fmt;
use xgboost::{parameters::BoosterParameters, Booster, DMatrix};

/// One evaluation of the validation set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundEval {
    pub round: usize,
    pub rmse:  f64,
}

pub struct GradientBoostedModel {
    pub names:          Vec<String>,
    pub init_score:     f64,
    /// Rounds run before stopping.
    pub rounds_trained: usize,
    /// Number of rounds used for prediction.
    pub best_iteration: usize,
    pub best_score:     f64,
    pub history:        Vec<RoundEval>,
    pub config:         BoostingConfig,
    booster:            Booster,
}

impl fmt::Debug for GradientBoostedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientBoostedModel")
            .field("names", &self.names)
            .field("init_score", &self.init_score)
            .field("rounds_trained", &self.rounds_trained)
            .field("best_iteration", &self.best_iteration)
            .field("best_score", &self.best_score)
            .finish_non_exhaustive()
    }
}

fn check_finite(what: &str, values: &[f64]) -> PricingResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(PricingError::InvalidValue {
            column: what.to_string(),
            row,
            value: values[row].to_string(),
        }),
        None => Ok(()),
    }
}

fn check_matrix(x: &DesignMatrix) -> PricingResult<()> {
    for (j, column) in x.values.columns().into_iter().enumerate() {
        if let Some(row) = column.iter().position(|v| !v.is_finite()) {
            return Err(PricingError::InvalidValue {
                column: x.names[j].clone(),
                row,
                value: column[row].to_string(),
            });
        }
    }
    Ok(())
}

/// Row-major f32 copy of `x`, optionally labelled.
fn dmatrix(x: &DesignMatrix, labels: Option<&[f64]>) -> PricingResult<DMatrix> {
    let data: Vec<f32> = x.values.iter().map(|&v| v as f32).collect();
    let mut dmat = DMatrix::from_dense(&data, x.n_rows())?;
    if let Some(y) = labels {
        let y: Vec<f32> = y.iter().map(|&v| v as f32).collect();
        dmat.set_labels(&y)?;
    }
    Ok(dmat)
}

fn predict_dmatrix(booster: &Booster, dmat: &DMatrix) -> PricingResult<Vec<f64>> {
    Ok(booster.predict(dmat)?.into_iter().map(f64::from).collect())
}

fn fit_rounds(params: &BoosterParameters, dtrain: &DMatrix, rounds: usize) -> PricingResult<Booster> {
    let mut booster = Booster::new_with_cached_dmats(params, &[dtrain])?;
    for round in 0..rounds {
        booster.update(dtrain, round as i32)?;
    }
    Ok(booster)
}

impl GradientBoostedModel {
    /// Train on (`x_train`, `y_train`), monitoring RMSE on
    /// (`x_valid`, `y_valid`) after every round. Training stops after
    /// `num_boost_round` rounds or after `early_stopping_rounds` rounds
    /// without improvement. The first round is always the first best.
    pub fn train(
        config: &BoostingConfig,
        x_train: &DesignMatrix,
        y_train: &[f64],
        x_valid: &DesignMatrix,
        y_valid: &[f64],
    ) -> PricingResult<Self> {
        if x_train.n_rows() == 0 || x_valid.n_rows() == 0 {
            return Err(PricingError::EmptySubset { model: "claim_cost".into() });
        }
        check_layout("claim_cost", &x_train.names, x_valid)?;
        check_matrix(x_train)?;
        check_matrix(x_valid)?;
        check_finite("y_train", y_train)?;
        check_finite("y_valid", y_valid)?;

        let init_score = mean(y_train);
        let params = booster_parameters(config, init_score)?;
        let dtrain = dmatrix(x_train, Some(y_train))?;
        let dvalid = dmatrix(x_valid, None)?;
        log::info!(
            "gbm: training on {} rows, {} features, {} validation rows",
            x_train.n_rows(),
            x_train.n_cols(),
            y_valid.len()
        );

        let mut booster = Booster::new_with_cached_dmats(&params, &[&dtrain, &dvalid])?;
        let mut history = Vec::new();
        let mut best_iteration = 0;
        let mut best_score = f64::INFINITY;
        let mut rounds_trained = 0;

        for round in 1..=config.num_boost_round {
            booster.update(&dtrain, (round - 1) as i32)?;
            rounds_trained = round;

            let score = rmse(y_valid, &predict_dmatrix(&booster, &dvalid)?)?;
            history.push(RoundEval { round, rmse: score });
            if config.log_every > 0 && round % config.log_every == 0 {
                log::info!("gbm: [{round}]\tvalid rmse: {score:.6}");
            }

            if score < best_score {
                best_score = score;
                best_iteration = round;
            } else if round - best_iteration >= config.early_stopping_rounds {
                log::info!(
                    "gbm: early stopping at round {round}, best iteration [{best_iteration}] rmse {best_score:.6}"
                );
                break;
            }
        }

        if rounds_trained > best_iteration {
            booster = fit_rounds(&params, &dtrain, best_iteration)?;
        }

        Ok(Self {
            names: x_train.names.clone(),
            init_score,
            rounds_trained,
            best_iteration,
            best_score,
            history,
            config: config.clone(),
            booster,
        })
    }
}

impl FittedModel for GradientBoostedModel {
    fn name(&self) -> &str {
        "claim_cost"
    }

    fn predict(&self, x: &DesignMatrix) -> PricingResult<Array1<f64>> {
        check_layout(self.name(), &self.names, x)?;
        check_matrix(x)?;
        Ok(Array1::from(predict_dmatrix(&self.booster, &dmatrix(x, None)?)?))
    }

    fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GradientBoostedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gradient-boosted regression trees (squared error)")?;
        writeln!(
            f,
            "  learning_rate={} num_leaves={} min_data_in_leaf={} max_bin={}",
            self.config.learning_rate,
            self.config.num_leaves,
            self.config.min_data_in_leaf,
            self.config.max_bin
        )?;
        writeln!(
            f,
            "  rounds trained={} best iteration={}",
            self.rounds_trained, self.best_iteration
        )?;
        write!(f, "  init score={:.4} best valid rmse={:.4}", self.init_score, self.best_score)
    }
}
