use openskill::{
    model::{model::Model, bradley_terry_part::BradleyTerryPart},
    rating::{default_gamma, Rating}
};

use crate::model::{constants::KAPPA, error::RatingModelError};

/// The Bayesian skill update. Rates one multi-competitor event at a time.
///
/// Implementations must return exactly one rating per team, in input order.
/// A higher score must move a team up relative to lower-scored teams.
pub trait RatingModel {
    fn rate(&self, teams: &[Vec<Rating>], scores: &[f64], beta: f64) -> Result<Vec<Rating>, RatingModelError>;
}

/// [`RatingModel`] backed by openskill's Bradley-Terry partial pairing model.
/// Scores are turned into placements, equal scores sharing a placement.
#[derive(Debug, Clone, Copy)]
pub struct BradleyTerryPartModel {
    pub kappa: f64
}

impl Default for BradleyTerryPartModel {
    fn default() -> Self {
        BradleyTerryPartModel { kappa: KAPPA }
    }
}

impl BradleyTerryPartModel {
    pub fn new(kappa: f64) -> BradleyTerryPartModel {
        BradleyTerryPartModel { kappa }
    }
}

impl RatingModel for BradleyTerryPartModel {
    fn rate(&self, teams: &[Vec<Rating>], scores: &[f64], beta: f64) -> Result<Vec<Rating>, RatingModelError> {
        if teams.len() != scores.len() {
            return Err(RatingModelError::ScoreCountMismatch {
                teams: teams.len(),
                scores: scores.len()
            });
        }

        // Nobody to compare against
        if teams.len() < 2 {
            return Ok(teams.iter().flatten().cloned().collect());
        }

        let model = BradleyTerryPart::new(beta, self.kappa, default_gamma);
        let placements = ranks_from_scores(scores);
        let results: Vec<Rating> = model.rate(teams.to_vec(), placements).into_iter().flatten().collect();

        if results.len() != teams.len() {
            return Err(RatingModelError::ArityMismatch {
                expected: teams.len(),
                actual: results.len()
            });
        }

        Ok(results)
    }
}

/// Returns a placement for each score as follows:
/// - The highest score is placed 1st.
/// - Equal scores share a placement; the next distinct score skips the shared slots (1, 2, 2, 4).
///
/// The lower the placement, the better. The results are returned in the
/// same order as the input.
pub fn ranks_from_scores(scores: &[f64]) -> Vec<usize> {
    let mut sorted_indices = (0..scores.len()).collect::<Vec<_>>();
    sorted_indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks = vec![0; scores.len()];
    for (position, &idx) in sorted_indices.iter().enumerate() {
        ranks[idx] = match position.checked_sub(1).map(|p| sorted_indices[p]) {
            Some(previous) if scores[previous] == scores[idx] => ranks[previous],
            _ => position + 1
        };
    }

    ranks
}
