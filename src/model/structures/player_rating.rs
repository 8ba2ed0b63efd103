use chrono::{DateTime, FixedOffset};
use openskill::rating::Rating;
use serde::Serialize;

use crate::model::{
    identity::{PlayerIdentity, PlayerKey},
    rating_utils::conservative_score
};

/// A competitor's current skill estimate within one division.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRating {
    pub key: PlayerKey,
    #[serde(flatten)]
    pub identity: PlayerIdentity,
    pub mu: f64,
    pub sigma: f64,
    pub matches_played: u32,
    /// Start time of the most recent match this player was rated in
    pub last_match_date: Option<DateTime<FixedOffset>>
}

impl PlayerRating {
    pub fn new(identity: PlayerIdentity, mu: f64, sigma: f64) -> PlayerRating {
        PlayerRating {
            key: identity.key(),
            identity,
            mu,
            sigma,
            matches_played: 0,
            last_match_date: None
        }
    }

    /// The rating in the form the rating model consumes.
    pub fn rating(&self) -> Rating {
        Rating {
            mu: self.mu,
            sigma: self.sigma
        }
    }

    pub fn conservative_score(&self, z: f64) -> f64 {
        conservative_score(self.mu, self.sigma, z)
    }

    /// Writes back the result of a rated match.
    /// `last_match_date` never moves backwards, even if matches arrive out of order.
    pub fn record_match(&mut self, rating: &Rating, timestamp: DateTime<FixedOffset>) {
        self.mu = rating.mu;
        self.sigma = rating.sigma;
        self.matches_played += 1;
        self.last_match_date = Some(match self.last_match_date {
            Some(last) if last > timestamp => last,
            _ => timestamp
        });
    }
}
