use crate::model::{
    constants::{KAPPA, MAX_SIGMA_MULTIPLIER, PERCENTILE, STARTING_MU},
    decay::{DecayConfig, DecayStrategy},
    error::ConfigError,
    rating_utils::{starting_sigma, z_score}
};

/// Everything that shapes a rating run. Several engines with different
/// configurations can run side by side; nothing here is global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub starting_mu: f64,
    /// Derived: `starting_mu / z`
    pub starting_sigma: f64,
    pub percentile: f64,
    /// Derived from `percentile`
    pub z: f64,
    pub max_sigma_multiplier: f64,
    pub kappa: f64,
    pub decay: DecayConfig
}

impl EngineConfig {
    pub fn new(
        starting_mu: f64,
        percentile: f64,
        strategy: DecayStrategy,
        max_sigma_multiplier: f64
    ) -> Result<EngineConfig, ConfigError> {
        if !starting_mu.is_finite() {
            return Err(ConfigError::StartingMu(starting_mu));
        }

        if !(max_sigma_multiplier >= 1.0 && max_sigma_multiplier.is_finite()) {
            return Err(ConfigError::MaxSigmaMultiplier(max_sigma_multiplier));
        }

        strategy.validate()?;

        let z = z_score(percentile)?;
        let starting_sigma = starting_sigma(starting_mu, z)?;

        Ok(EngineConfig {
            starting_mu,
            starting_sigma,
            percentile,
            z,
            max_sigma_multiplier,
            kappa: KAPPA,
            decay: DecayConfig::new(strategy, starting_sigma, max_sigma_multiplier)
        })
    }

    /// Same configuration with a different decay strategy, e.g. for replaying history
    /// under alternative decay parameters.
    pub fn with_decay(&self, strategy: DecayStrategy) -> Result<EngineConfig, ConfigError> {
        Self::new(self.starting_mu, self.percentile, strategy, self.max_sigma_multiplier)
    }

    pub fn sigma_ceiling(&self) -> f64 {
        self.decay.sigma_ceiling
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        // z(80) = 0.8416...; the defaults always validate
        let z = 0.8416212335729143;
        let starting_sigma = STARTING_MU / z;

        EngineConfig {
            starting_mu: STARTING_MU,
            starting_sigma,
            percentile: PERCENTILE,
            z,
            max_sigma_multiplier: MAX_SIGMA_MULTIPLIER,
            kappa: KAPPA,
            decay: DecayConfig::new(DecayStrategy::default(), starting_sigma, MAX_SIGMA_MULTIPLIER)
        }
    }
}
