use statrs::distribution::{ContinuousCDF, Normal};

use crate::model::error::ConfigError;

/// The standard normal quantile below which `percentile`% of the distribution lies.
///
/// `z_score(80.0)` ≈ 0.8416
pub fn z_score(percentile: f64) -> Result<f64, ConfigError> {
    if !(percentile > 0.0 && percentile < 100.0) {
        return Err(ConfigError::Percentile(percentile));
    }

    let normal = Normal::new(0.0, 1.0).map_err(|_| ConfigError::Percentile(percentile))?;

    Ok(normal.inverse_cdf(percentile / 100.0))
}

/// Risk-adjusted skill: `mu - z * sigma`.
pub fn conservative_score(mu: f64, sigma: f64, z: f64) -> f64 {
    mu - z * sigma
}

/// The sigma at which a player rated `starting_mu` has a conservative score of exactly 0.
pub fn starting_sigma(starting_mu: f64, z: f64) -> Result<f64, ConfigError> {
    let sigma = starting_mu / z;
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ConfigError::StartingSigma(sigma));
    }

    Ok(sigma)
}
