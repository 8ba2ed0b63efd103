use serde::Serialize;

use crate::model::identity::PlayerKey;

/// One row of a ranking snapshot. Recomputed from scratch on every ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub combined_rank: usize,
    pub category_rank: usize,
    pub player_key: PlayerKey,
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub region: String,
    pub division: String,
    pub mu: f64,
    pub sigma: f64,
    pub conservative_score: f64,
    pub matches_played: u32,
    /// Conservative score relative to the best in the division, or 0 when that best is not positive
    pub percentage_of_best: f64
}
