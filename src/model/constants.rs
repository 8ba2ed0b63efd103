// Model constants
pub const STARTING_MU: f64 = 25.0;
/// Percentile of the skill distribution used for conservative scores.
/// The starting sigma is derived from it so that a new player's conservative score is 0.
pub const PERCENTILE: f64 = 80.0;
pub const KAPPA: f64 = 0.0001;
// Time decay
pub const EXPONENTIAL_INITIAL_DECAY: f64 = 0.002;
pub const EXPONENTIAL_GROWTH_RATE: f64 = 0.01;
pub const CONSTANT_DECAY_RATE: f64 = 0.01;
pub const MAX_SIGMA_MULTIPLIER: f64 = 2.0;
pub const DAYS_PER_MONTH: f64 = 30.0;
