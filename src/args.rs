use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::model::{
    config::EngineConfig,
    constants::{
        CONSTANT_DECAY_RATE, EXPONENTIAL_GROWTH_RATE, EXPONENTIAL_INITIAL_DECAY, MAX_SIGMA_MULTIPLIER, PERCENTILE,
        STARTING_MU
    },
    decay::DecayStrategy,
    error::ConfigError
};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecayKind {
    /// Slow at first, accelerating with longer breaks
    Exponential,
    /// Linear in days inactive
    Constant
}

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "IPSC Rating",
    long_about = "Rates IPSC competitors from scraped match results and writes per-division rankings"
)]
pub struct Args {
    /// Directory holding one JSON file per match
    #[arg(short, long, env = "MATCHES_DIR", default_value = "match_data")]
    pub matches_dir: PathBuf,

    /// Directory the ranking files are written to
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "results")]
    pub output_dir: PathBuf,

    /// File name prefix for the ranking files
    #[arg(long, default_value = "ipsc_ranking")]
    pub output_prefix: String,

    /// Only rank players from this region, e.g. SWE. All players are still rated.
    #[arg(short, long, env = "REGION")]
    pub region: Option<String>,

    /// Percentile for the conservative score, strictly between 50 and 100
    #[arg(long, default_value_t = PERCENTILE)]
    pub percentile: f64,

    #[arg(long, default_value_t = STARTING_MU)]
    pub starting_mu: f64,

    #[arg(long, value_enum, default_value_t = DecayKind::Exponential)]
    pub decay: DecayKind,

    /// Exponential decay: scale of the added sigma
    #[arg(long, default_value_t = EXPONENTIAL_INITIAL_DECAY)]
    pub initial_decay: f64,

    /// Exponential decay: growth per 30 days inactive
    #[arg(long, default_value_t = EXPONENTIAL_GROWTH_RATE)]
    pub growth_rate: f64,

    /// Constant decay: sigma added per day inactive
    #[arg(long, default_value_t = CONSTANT_DECAY_RATE)]
    pub decay_rate: f64,

    /// Sigma never decays beyond the starting sigma times this
    #[arg(long, default_value_t = MAX_SIGMA_MULTIPLIER)]
    pub max_sigma_multiplier: f64,

    /// Decay everybody up to the current time before ranking
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub decay_to_now: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

impl Args {
    pub fn decay_strategy(&self) -> DecayStrategy {
        match self.decay {
            DecayKind::Exponential => DecayStrategy::Exponential {
                initial_decay: self.initial_decay,
                growth_rate: self.growth_rate
            },
            DecayKind::Constant => DecayStrategy::Constant { rate: self.decay_rate }
        }
    }

    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig::new(
            self.starting_mu,
            self.percentile,
            self.decay_strategy(),
            self.max_sigma_multiplier
        )
    }
}
