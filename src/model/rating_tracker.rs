use indexmap::IndexMap;
use openskill::rating::Rating;

use chrono::{DateTime, FixedOffset};

use crate::model::{
    identity::{PlayerIdentity, PlayerKey},
    structures::player_rating::PlayerRating
};

/// Owns every [`PlayerRating`] for the lifetime of a processing run.
///
/// Ratings are kept in creation order. That order is the tie-breaker when
/// ranking players with identical scores.
pub struct RatingTracker {
    ratings: IndexMap<PlayerKey, PlayerRating>,
    starting_mu: f64,
    starting_sigma: f64
}

impl RatingTracker {
    pub fn new(starting_mu: f64, starting_sigma: f64) -> RatingTracker {
        RatingTracker {
            ratings: IndexMap::new(),
            starting_mu,
            starting_sigma
        }
    }

    /// Returns the rating for this identity, creating a default one if the player is new.
    ///
    /// An alias seen for the first time is stored on an existing rating.
    pub fn get_or_create(&mut self, identity: PlayerIdentity) -> &mut PlayerRating {
        let (mu, sigma) = (self.starting_mu, self.starting_sigma);

        let rating = self
            .ratings
            .entry(identity.key())
            .or_insert_with(|| PlayerRating::new(identity.clone(), mu, sigma));

        if rating.identity.alias.is_none() && identity.alias.is_some() {
            rating.identity.alias = identity.alias;
        }

        rating
    }

    pub fn get_rating(&self, key: &PlayerKey) -> Option<&PlayerRating> {
        self.ratings.get(key)
    }

    pub fn get_rating_mut(&mut self, key: &PlayerKey) -> Option<&mut PlayerRating> {
        self.ratings.get_mut(key)
    }

    pub fn contains(&self, key: &PlayerKey) -> bool {
        self.ratings.contains_key(key)
    }

    /// Applies the model's output for one match. `updates` must refer to tracked players.
    /// Returns the number of ratings written.
    pub fn insert_or_update(&mut self, updates: &[(PlayerKey, Rating)], timestamp: DateTime<FixedOffset>) -> usize {
        let mut written = 0;
        for (key, rating) in updates {
            if let Some(player_rating) = self.ratings.get_mut(key) {
                player_rating.record_match(rating, timestamp);
                written += 1;
            }
        }

        written
    }

    /// Ratings in creation order
    pub fn iter(&self) -> impl Iterator<Item = &PlayerRating> {
        self.ratings.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerRating> {
        self.ratings.values_mut()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn starting_mu(&self) -> f64 {
        self.starting_mu
    }

    pub fn starting_sigma(&self) -> f64 {
        self.starting_sigma
    }
}
