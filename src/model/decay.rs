use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::trace;

use crate::model::{
    constants::{CONSTANT_DECAY_RATE, DAYS_PER_MONTH, EXPONENTIAL_GROWTH_RATE, EXPONENTIAL_INITIAL_DECAY},
    error::ConfigError,
    rating_tracker::RatingTracker,
    structures::player_rating::PlayerRating
};

/// How quickly uncertainty grows while a player is inactive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecayStrategy {
    /// `rate * days`
    Constant { rate: f64 },
    /// `initial_decay * (exp(growth_rate * days / 30) - 1)`
    ///
    /// Gentle for short breaks, accelerating for long ones.
    Exponential { initial_decay: f64, growth_rate: f64 }
}

impl Default for DecayStrategy {
    fn default() -> Self {
        DecayStrategy::Exponential {
            initial_decay: EXPONENTIAL_INITIAL_DECAY,
            growth_rate: EXPONENTIAL_GROWTH_RATE
        }
    }
}

impl DecayStrategy {
    pub fn constant() -> Self {
        DecayStrategy::Constant {
            rate: CONSTANT_DECAY_RATE
        }
    }

    /// Sigma added for `days_inactive` days without a match. Zero for non-positive gaps
    /// and for a zero rate. Overflowing growth saturates to infinity.
    pub fn additional_sigma(&self, days_inactive: i64) -> f64 {
        if days_inactive <= 0 {
            return 0.0;
        }

        let days = days_inactive as f64;
        match *self {
            DecayStrategy::Constant { rate } => rate * days,
            // 0 * inf would be NaN
            DecayStrategy::Exponential { initial_decay, .. } if initial_decay == 0.0 => 0.0,
            DecayStrategy::Exponential {
                initial_decay,
                growth_rate
            } => initial_decay * (growth_rate * days / DAYS_PER_MONTH).exp_m1()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parameters = match *self {
            DecayStrategy::Constant { rate } => vec![("rate", rate)],
            DecayStrategy::Exponential {
                initial_decay,
                growth_rate
            } => vec![("initial_decay", initial_decay), ("growth_rate", growth_rate)]
        };

        for (name, value) in parameters {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::DecayParameter { name, value });
            }
        }

        Ok(())
    }
}

/// A decay strategy together with the hard ceiling on sigma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayConfig {
    pub strategy: DecayStrategy,
    /// `starting_sigma * max_multiplier`
    pub sigma_ceiling: f64
}

impl DecayConfig {
    pub fn new(strategy: DecayStrategy, starting_sigma: f64, max_multiplier: f64) -> DecayConfig {
        DecayConfig {
            strategy,
            sigma_ceiling: starting_sigma * max_multiplier
        }
    }

    /// Returns the decayed sigma. Never lower than `current_sigma`, never above the ceiling
    /// unless `current_sigma` already was.
    pub fn decay(&self, current_sigma: f64, days_inactive: i64) -> f64 {
        if days_inactive <= 0 || current_sigma >= self.sigma_ceiling {
            return current_sigma;
        }

        (current_sigma + self.strategy.additional_sigma(days_inactive)).min(self.sigma_ceiling)
    }
}

/// Running totals of applied decay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecayStats {
    /// Decay applications that increased a player's sigma
    pub players_affected: u64,
    pub total_decay_applied: f64,
    pub max_days_inactive: i64
}

impl DecayStats {
    pub fn average_decay(&self) -> Option<f64> {
        match self.players_affected {
            0 => None,
            n => Some(self.total_decay_applied / n as f64)
        }
    }

    fn record(&mut self, added_sigma: f64, days_inactive: i64) {
        self.players_affected += 1;
        self.total_decay_applied += added_sigma;
        self.max_days_inactive = self.max_days_inactive.max(days_inactive);
    }
}

/// # How this works
/// - The processor calls this at some point in time, D (the start of the match about to be
///   rated, or an explicit reference time for an "as of" snapshot)
/// - The player's last match was played at T
/// - Sigma grows by the configured strategy for the whole days in (D - T), capped at the ceiling
/// - Mu is never touched
///
/// Players without a recorded match, or who played on the same day, are left alone.
#[derive(Debug, Clone, Copy)]
pub struct DecayTracker {
    pub config: DecayConfig
}

impl DecayTracker {
    pub fn new(config: DecayConfig) -> DecayTracker {
        DecayTracker { config }
    }

    /// Decays a single player relative to `current_time`. Returns the sigma added.
    pub fn decay(&self, player_rating: &mut PlayerRating, current_time: DateTime<FixedOffset>, stats: &mut DecayStats) -> f64 {
        let Some(days_inactive) = days_inactive(player_rating, current_time) else {
            return 0.0;
        };

        let new_sigma = self.config.decay(player_rating.sigma, days_inactive);
        let added = new_sigma - player_rating.sigma;

        if added > 0.0 {
            trace!(
                player = %player_rating.key,
                days_inactive,
                sigma_before = player_rating.sigma,
                sigma_after = new_sigma,
                "Applied decay"
            );
            player_rating.sigma = new_sigma;
            stats.record(added, days_inactive);
        }

        added
    }

    /// Decays every tracked player relative to `current_time`.
    pub fn decay_all(&self, rating_tracker: &mut RatingTracker, current_time: DateTime<FixedOffset>, stats: &mut DecayStats) {
        for player_rating in rating_tracker.iter_mut() {
            self.decay(player_rating, current_time, stats);
        }
    }
}

/// Whole days between the player's last match and `current_time`, if they have played before.
fn days_inactive(player_rating: &PlayerRating, current_time: DateTime<FixedOffset>) -> Option<i64> {
    player_rating
        .last_match_date
        .map(|last_match| (current_time - last_match).num_days())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    use crate::{
        model::{
            decay::{DecayConfig, DecayStats, DecayStrategy, DecayTracker},
            error::ConfigError,
            rating_tracker::RatingTracker
        },
        utils::test_utils::{generate_identity, generate_player_rating, timestamp}
    };

    const STARTING_SIGMA: f64 = 25.0 / 0.8416212335729143;

    fn exponential() -> DecayStrategy {
        DecayStrategy::Exponential {
            initial_decay: 0.002,
            growth_rate: 0.01
        }
    }

    #[test]
    fn test_exponential_90_days() {
        let added = exponential().additional_sigma(90);
        let expected = 0.002 * ((0.01f64 * 90.0 / 30.0).exp() - 1.0);

        assert_abs_diff_eq!(added, expected, epsilon = 1e-15);
        assert_abs_diff_eq!(added, 0.0000609, epsilon = 1e-7);
    }

    #[test]
    fn test_constant_90_days() {
        let added = DecayStrategy::Constant { rate: 0.01 }.additional_sigma(90);

        assert_abs_diff_eq!(added, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_no_decay_without_inactivity() {
        let config = DecayConfig::new(DecayStrategy::constant(), STARTING_SIGMA, 2.0);

        assert_eq!(config.decay(5.0, 0), 5.0);
        assert_eq!(config.decay(5.0, -3), 5.0);
        assert_eq!(exponential().additional_sigma(0), 0.0);
    }

    #[test]
    fn test_decay_is_monotonic() {
        for strategy in [exponential(), DecayStrategy::constant()] {
            let config = DecayConfig::new(strategy, STARTING_SIGMA, 2.0);
            for sigma in [0.0, 1.5, 10.0, STARTING_SIGMA, 59.0] {
                for days in [1, 7, 30, 365, 3650] {
                    assert!(config.decay(sigma, days) >= sigma);
                }
            }
        }
    }

    #[test]
    fn test_decay_ceiling() {
        for strategy in [exponential(), DecayStrategy::constant()] {
            let config = DecayConfig::new(strategy, STARTING_SIGMA, 2.0);
            for days in [1, 1_000, 100_000, 10_000_000] {
                assert!(config.decay(STARTING_SIGMA, days) <= STARTING_SIGMA * 2.0);
            }
        }

        let config = DecayConfig::new(DecayStrategy::constant(), STARTING_SIGMA, 2.0);
        assert_abs_diff_eq!(config.decay(STARTING_SIGMA, 100_000), STARTING_SIGMA * 2.0);
    }

    #[test]
    fn test_zero_initial_decay_never_decays() {
        let strategy = DecayStrategy::Exponential {
            initial_decay: 0.0,
            growth_rate: 10.0
        };
        let config = DecayConfig::new(strategy, STARTING_SIGMA, 2.0);

        assert_eq!(strategy.additional_sigma(3000), 0.0);
        assert_eq!(config.decay(5.0, 3000), 5.0);
    }

    #[test]
    fn test_overflowing_growth_saturates_at_ceiling() {
        let strategy = DecayStrategy::Exponential {
            initial_decay: 0.002,
            growth_rate: 10.0
        };
        let config = DecayConfig::new(strategy, STARTING_SIGMA, 2.0);

        assert_eq!(strategy.additional_sigma(3000), f64::INFINITY);
        assert_abs_diff_eq!(config.decay(5.0, 3000), STARTING_SIGMA * 2.0);
    }

    #[test]
    fn test_sigma_above_ceiling_is_left_alone() {
        let config = DecayConfig::new(DecayStrategy::constant(), 10.0, 2.0);

        assert_eq!(config.decay(25.0, 400), 25.0);
    }

    #[test]
    fn test_validate() {
        assert!(exponential().validate().is_ok());
        assert_eq!(
            DecayStrategy::Constant { rate: -0.1 }.validate(),
            Err(ConfigError::DecayParameter {
                name: "rate",
                value: -0.1
            })
        );
        assert!(DecayStrategy::Exponential {
            initial_decay: 0.002,
            growth_rate: f64::INFINITY
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_tracker_decays_sigma_only() {
        let tracker = DecayTracker::new(DecayConfig::new(DecayStrategy::constant(), STARTING_SIGMA, 2.0));
        let last_played = timestamp("2024-01-01T12:00:00Z");
        let mut rating = generate_player_rating("Anna", "Berg", 30.0, 2.0, Some(last_played));
        let mut stats = DecayStats::default();

        let added = tracker.decay(&mut rating, last_played + Duration::days(90), &mut stats);

        assert_abs_diff_eq!(added, 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(rating.sigma, 2.9, epsilon = 1e-12);
        assert_eq!(rating.mu, 30.0);
        assert_eq!(stats.players_affected, 1);
        assert_eq!(stats.max_days_inactive, 90);
    }

    #[test]
    fn test_tracker_ignores_same_day_and_new_players() {
        let tracker = DecayTracker::new(DecayConfig::new(DecayStrategy::constant(), STARTING_SIGMA, 2.0));
        let last_played = timestamp("2024-01-01T08:00:00Z");
        let mut same_day = generate_player_rating("Anna", "Berg", 30.0, 2.0, Some(last_played));
        let mut new_player = generate_player_rating("Bo", "Ek", 25.0, STARTING_SIGMA, None);
        let mut stats = DecayStats::default();

        assert_eq!(tracker.decay(&mut same_day, last_played + Duration::hours(20), &mut stats), 0.0);
        assert_eq!(tracker.decay(&mut new_player, last_played, &mut stats), 0.0);
        assert_eq!(same_day.sigma, 2.0);
        assert_eq!(new_player.sigma, STARTING_SIGMA);
        assert_eq!(stats, DecayStats::default());
        assert_eq!(stats.average_decay(), None);
    }

    #[test]
    fn test_decay_all() {
        let tracker = DecayTracker::new(DecayConfig::new(DecayStrategy::constant(), STARTING_SIGMA, 2.0));
        let mut rating_tracker = RatingTracker::new(25.0, STARTING_SIGMA);
        let last_played = timestamp("2024-01-01T00:00:00Z");

        for (first, last) in [("Anna", "Berg"), ("Bo", "Ek")] {
            let rating = rating_tracker.get_or_create(generate_identity(first, last, "SWE", "Open"));
            rating.sigma = 3.0;
            rating.last_match_date = Some(last_played);
        }
        rating_tracker.get_or_create(generate_identity("Cai", "Lund", "SWE", "Open"));

        let mut stats = DecayStats::default();
        tracker.decay_all(&mut rating_tracker, last_played + Duration::days(10), &mut stats);

        let sigmas = rating_tracker.iter().map(|r| r.sigma).collect::<Vec<_>>();
        assert_abs_diff_eq!(sigmas[0], 3.1, epsilon = 1e-12);
        assert_abs_diff_eq!(sigmas[1], 3.1, epsilon = 1e-12);
        assert_abs_diff_eq!(sigmas[2], STARTING_SIGMA);
        assert_eq!(stats.players_affected, 2);
        assert_abs_diff_eq!(stats.average_decay().unwrap(), 0.1, epsilon = 1e-12);
    }
}
