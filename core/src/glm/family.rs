//! Exponential-family distributions with a log link.

use crate::stats::ln_gamma;

/// Smallest mean kept during IRLS, so `ln(mu)` stays finite.
pub const MU_FLOOR: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Poisson,
    Gamma,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Poisson => "Poisson",
            Self::Gamma   => "Gamma",
        }
    }

    pub fn link_name(&self) -> &'static str {
        "Log"
    }

    /// Whether a response value lies in the family's support.
    pub fn admits(&self, y: f64) -> bool {
        match self {
            Self::Poisson => y >= 0.0 && y.is_finite(),
            Self::Gamma   => y > 0.0 && y.is_finite(),
        }
    }

    /// V(mu).
    pub fn variance(&self, mu: f64) -> f64 {
        match self {
            Self::Poisson => mu,
            Self::Gamma   => mu * mu,
        }
    }

    /// IRLS weight 1 / (g'(mu)² V(mu)) with g = ln.
    pub fn irls_weight(&self, mu: f64) -> f64 {
        mu * mu / self.variance(mu)
    }

    pub fn starting_mu(&self, y: f64, y_mean: f64) -> f64 {
        ((y + y_mean) / 2.0).max(MU_FLOOR)
    }

    /// Unit deviance d(y, mu).
    pub fn unit_deviance(&self, y: f64, mu: f64) -> f64 {
        match self {
            Self::Poisson => {
                let ylogy = if y > 0.0 { y * (y / mu).ln() } else { 0.0 };
                2.0 * (ylogy - (y - mu))
            }
            Self::Gamma => 2.0 * (-(y / mu).ln() + (y - mu) / mu),
        }
    }

    /// Only the Gamma family estimates a dispersion.
    pub fn fixed_scale(&self) -> bool {
        matches!(self, Self::Poisson)
    }

    /// Per-observation log-likelihood at dispersion `scale`.
    pub fn log_likelihood(&self, y: f64, mu: f64, scale: f64) -> f64 {
        match self {
            Self::Poisson => y * mu.ln() - mu - ln_gamma(y + 1.0),
            Self::Gamma => {
                let w = 1.0 / scale;
                let ratio = y / mu;
                w * (w * ratio).ln() - w * ratio - y.ln() - ln_gamma(w)
            }
        }
    }
}
