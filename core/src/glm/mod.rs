//! Generalized linear models fitted by iteratively reweighted least
//! squares (IRLS).

pub mod family;
mod summary;

pub use family::Family;

use crate::{
    config::GlmConfig,
    encoding::DesignMatrix,
    error::{PricingError, PricingResult},
    linalg::Cholesky,
    model::{check_layout, FittedModel},
    stats::{two_sided_p, Z_975},
};
use family::MU_FLOOR;
use ndarray::{Array1, Array2};

/// Upper bound on the linear predictor so `exp` cannot overflow.
const ETA_CAP: f64 = 700.0;

/// An unfitted GLM: a name for logs and errors, a response label for
/// the summary, and a family.
#[derive(Debug, Clone)]
pub struct Glm {
    pub name:     String,
    pub response: String,
    pub family:   Family,
}

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub name:     String,
    pub estimate: f64,
    pub std_err:  f64,
    pub z:        f64,
    pub p_value:  f64,
    pub ci_low:   f64,
    pub ci_high:  f64,
}

#[derive(Debug, Clone)]
pub struct GlmFit {
    pub name:           String,
    pub response:       String,
    pub family:         Family,
    pub names:          Vec<String>,
    pub params:         Array1<f64>,
    pub coefficients:   Vec<Coefficient>,
    pub n_obs:          usize,
    pub df_model:       usize,
    pub df_resid:       usize,
    pub scale:          f64,
    pub deviance:       f64,
    pub pearson_chi2:   f64,
    pub log_likelihood: f64,
    pub aic:            f64,
    pub iterations:     usize,
}

impl Glm {
    pub fn new(name: impl Into<String>, response: impl Into<String>, family: Family) -> Self {
        Self { name: name.into(), response: response.into(), family }
    }

    fn weighted_normal_equations(
        x: &Array2<f64>,
        w: &Array1<f64>,
        z: &Array1<f64>,
    ) -> (Array2<f64>, Array1<f64>) {
        let xw = x * &w.view().insert_axis(ndarray::Axis(1));
        (xw.t().dot(x), xw.t().dot(z))
    }

    fn deviance(&self, y: &Array1<f64>, mu: &Array1<f64>) -> f64 {
        y.iter().zip(mu).map(|(&y, &m)| self.family.unit_deviance(y, m)).sum()
    }

    fn mean_from(eta: &Array1<f64>) -> Array1<f64> {
        eta.mapv(|e| e.min(ETA_CAP).exp().max(MU_FLOOR))
    }

    /// Maximum-likelihood fit of `y` on `x`. `x` is used as given, so
    /// include the intercept column if one is wanted.
    pub fn fit(&self, x: &DesignMatrix, y: &Array1<f64>, config: &GlmConfig) -> PricingResult<GlmFit> {
        let n = x.n_rows();
        let p = x.n_cols();
        if n == 0 {
            return Err(PricingError::EmptySubset { model: self.name.clone() });
        }
        if let Some((row, &bad)) = y.iter().enumerate().find(|&(_, &v)| !self.family.admits(v)) {
            return Err(PricingError::InvalidValue {
                column: self.response.clone(),
                row,
                value: format!("{bad} is outside the {} support", self.family.name()),
            });
        }

        // Columns are rescaled to unit RMS before solving; coefficients
        // and covariance are mapped back afterwards.
        let col_scale: Array1<f64> = x
            .values
            .columns()
            .into_iter()
            .map(|c| {
                let rms = (c.mapv(|v| v * v).sum() / n as f64).sqrt();
                if rms > 0.0 { rms } else { 1.0 }
            })
            .collect();
        let xs = &x.values / &col_scale;

        let y_mean = y.mean().unwrap_or(0.0);
        let mut mu = y.mapv(|v| self.family.starting_mu(v, y_mean));
        let mut eta = mu.mapv(f64::ln);
        let mut dev = self.deviance(y, &mu);
        let mut params = Array1::<f64>::zeros(p);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < config.max_iter {
            iterations += 1;
            let w = mu.mapv(|m| self.family.irls_weight(m));
            // Working response for the log link: eta + (y - mu) / mu.
            let z = &eta + &((y - &mu) / &mu);
            let (xtwx, xtwz) = Self::weighted_normal_equations(&xs, &w, &z);
            let chol = Cholesky::factor(&xtwx)
                .ok_or_else(|| PricingError::SingularDesign { model: self.name.clone() })?;
            params = chol.solve(&xtwz);

            eta = xs.dot(&params);
            mu = Self::mean_from(&eta);
            let dev_new = self.deviance(y, &mu);
            log::debug!("glm[{}]: iteration {iterations} deviance {dev_new:.6}", self.name);

            if !dev_new.is_finite() {
                break;
            }
            let delta = (dev - dev_new).abs();
            dev = dev_new;
            if delta <= config.tol {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(PricingError::NonConvergence { model: self.name.clone(), iterations });
        }

        let w = mu.mapv(|m| self.family.irls_weight(m));
        let (xtwx, _) = Self::weighted_normal_equations(&xs, &w, &eta);
        let cov_scaled = Cholesky::factor(&xtwx)
            .ok_or_else(|| PricingError::SingularDesign { model: self.name.clone() })?
            .inverse();
        let params = &params / &col_scale;
        let cov_unscaled = Array2::from_shape_fn((p, p), |(i, j)| {
            cov_scaled[[i, j]] / (col_scale[i] * col_scale[j])
        });

        let df_model = p.saturating_sub(1);
        let df_resid = n.saturating_sub(p);
        let pearson_chi2: f64 = y
            .iter()
            .zip(&mu)
            .map(|(&y, &m)| (y - m).powi(2) / self.family.variance(m))
            .sum();
        let scale = if self.family.fixed_scale() {
            1.0
        } else if df_resid > 0 {
            pearson_chi2 / df_resid as f64
        } else {
            f64::NAN
        };

        let coefficients = x
            .names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let estimate = params[j];
                let std_err = (scale * cov_unscaled[[j, j]]).sqrt();
                let z = estimate / std_err;
                Coefficient {
                    name: name.clone(),
                    estimate,
                    std_err,
                    z,
                    p_value: two_sided_p(z),
                    ci_low:  estimate - Z_975 * std_err,
                    ci_high: estimate + Z_975 * std_err,
                }
            })
            .collect();

        let log_likelihood: f64 = y
            .iter()
            .zip(&mu)
            .map(|(&y, &m)| self.family.log_likelihood(y, m, scale))
            .sum();
        let aic = -2.0 * log_likelihood + 2.0 * (df_model as f64 + 1.0);

        log::info!(
            "glm[{}]: {} family converged in {iterations} iterations, deviance {dev:.4}",
            self.name,
            self.family.name()
        );

        Ok(GlmFit {
            name: self.name.clone(),
            response: self.response.clone(),
            family: self.family,
            names: x.names.clone(),
            params,
            coefficients,
            n_obs: n,
            df_model,
            df_resid,
            scale,
            deviance: dev,
            pearson_chi2,
            log_likelihood,
            aic,
            iterations,
        })
    }
}

impl GlmFit {
    /// Fitted mean `exp(X β)` for rows already laid out like the fit.
    fn mean(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.params).mapv(|e| e.min(ETA_CAP).exp())
    }
}

impl FittedModel for GlmFit {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, x: &DesignMatrix) -> PricingResult<Array1<f64>> {
        check_layout(&self.name, &self.names, x)?;
        Ok(self.mean(&x.values))
    }

    fn summary(&self) -> String {
        self.to_string()
    }
}
