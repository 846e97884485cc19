use super::GlmFit;
use std::fmt;

const WIDTH: usize = 78;

fn header_pair(f: &mut fmt::Formatter<'_>, left: (&str, String), right: (&str, String)) -> fmt::Result {
    writeln!(
        f,
        "{:<16}{:>22}   {:<18}{:>19}",
        left.0, left.1, right.0, right.1
    )
}

impl fmt::Display for GlmFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(WIDTH);
        writeln!(f, "{:^WIDTH$}", "Generalized Linear Model Regression Results")?;
        writeln!(f, "{rule}")?;
        header_pair(f, ("Dep. Variable:", self.response.clone()), ("No. Observations:", self.n_obs.to_string()))?;
        header_pair(f, ("Model:", "GLM".into()), ("Df Residuals:", self.df_resid.to_string()))?;
        header_pair(f, ("Model Family:", self.family.name().into()), ("Df Model:", self.df_model.to_string()))?;
        header_pair(f, ("Link Function:", self.family.link_name().into()), ("Scale:", format!("{:.4}", self.scale)))?;
        header_pair(f, ("Method:", "IRLS".into()), ("Log-Likelihood:", format!("{:.2}", self.log_likelihood)))?;
        header_pair(f, ("Deviance:", format!("{:.2}", self.deviance)), ("Pearson chi2:", format!("{:.3e}", self.pearson_chi2)))?;
        header_pair(f, ("No. Iterations:", self.iterations.to_string()), ("AIC:", format!("{:.2}", self.aic)))?;
        writeln!(f, "{rule}")?;

        let name_width = self
            .coefficients
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max(14);
        writeln!(
            f,
            "{:<name_width$}{:>10} {:>10} {:>10} {:>10} {:>11} {:>11}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]"
        )?;
        writeln!(f, "{}", "-".repeat(name_width + 67))?;
        for c in &self.coefficients {
            writeln!(
                f,
                "{:<name_width$}{:>10.4} {:>10.3} {:>10.3} {:>10.3} {:>11.3} {:>11.3}",
                c.name, c.estimate, c.std_err, c.z, c.p_value, c.ci_low, c.ci_high
            )?;
        }
        write!(f, "{rule}")
    }
}
