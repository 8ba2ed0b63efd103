use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{
    rating_tracker::RatingTracker,
    structures::{player_rating::PlayerRating, ranking_entry::RankingEntry}
};

/// A ranking snapshot, ordered by combined rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankingEntry> {
        self.entries.iter()
    }

    /// Per-division views ordered by category rank. Divisions appear in the
    /// order their best player appears in the combined ranking.
    pub fn by_category(&self) -> IndexMap<&str, Vec<&RankingEntry>> {
        let mut categories: IndexMap<&str, Vec<&RankingEntry>> = IndexMap::new();
        for entry in &self.entries {
            categories.entry(entry.division.as_str()).or_default().push(entry);
        }

        categories
    }

    pub fn category(&self, division: &str) -> Vec<&RankingEntry> {
        self.entries.iter().filter(|e| e.division == division).collect()
    }
}

/// Builds a combined and per-division ranking of every player accepted by `filter`.
///
/// Players are ordered by conservative score (`mu - z * sigma`), descending. Equal scores keep
/// the order in which players were first seen. Ratings are only read.
pub fn generate_ranking<F>(rating_tracker: &RatingTracker, z: f64, filter: F) -> Ranking
where
    F: Fn(&PlayerRating) -> bool
{
    let mut scored: Vec<(&PlayerRating, f64)> = rating_tracker
        .iter()
        .filter(|rating| filter(rating))
        .map(|rating| (rating, rating.conservative_score(z)))
        .collect();

    // Stable: ties stay in creation order
    scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    // Walking the combined order visits each division in its own sorted order,
    // so the first score seen per division is its best.
    let mut category_counts: HashMap<&str, usize> = HashMap::new();
    let mut category_best: HashMap<&str, f64> = HashMap::new();

    let entries = scored
        .iter()
        .enumerate()
        .map(|(position, (rating, score))| {
            let division = rating.identity.division.as_str();
            let category_rank = category_counts.entry(division).or_default();
            *category_rank += 1;
            let best = *category_best.entry(division).or_insert(*score);

            RankingEntry {
                combined_rank: position + 1,
                category_rank: *category_rank,
                player_key: rating.key.clone(),
                first_name: rating.identity.first_name.clone(),
                last_name: rating.identity.last_name.clone(),
                alias: rating.identity.alias.clone(),
                region: rating.identity.region.clone(),
                division: rating.identity.division.clone(),
                mu: rating.mu,
                sigma: rating.sigma,
                conservative_score: *score,
                matches_played: rating.matches_played,
                percentage_of_best: percentage_of_best(*score, best)
            }
        })
        .collect();

    Ranking { entries }
}

/// Ranks every tracked player.
pub fn generate_full_ranking(rating_tracker: &RatingTracker, z: f64) -> Ranking {
    generate_ranking(rating_tracker, z, |_| true)
}

/// A filter accepting players from `region`, compared case-insensitively.
pub fn in_region(region: &str) -> impl Fn(&PlayerRating) -> bool + '_ {
    move |rating: &PlayerRating| rating.identity.region.eq_ignore_ascii_case(region)
}

fn percentage_of_best(score: f64, best: f64) -> f64 {
    if best > 0.0 {
        score / best * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        model::{
            ranking::{generate_full_ranking, generate_ranking, in_region, percentage_of_best},
            rating_tracker::RatingTracker
        },
        utils::test_utils::generate_identity
    };

    const Z: f64 = 0.8416212335729143;

    fn tracker(players: &[(&str, &str, &str, f64, f64)]) -> RatingTracker {
        let mut rating_tracker = RatingTracker::new(25.0, 29.7);
        for (first, region, division, mu, sigma) in players {
            let rating = rating_tracker.get_or_create(generate_identity(first, "Test", region, division));
            rating.mu = *mu;
            rating.sigma = *sigma;
        }

        rating_tracker
    }

    #[test]
    fn test_scenario_two_players() {
        let rating_tracker = tracker(&[("B", "SWE", "Open", 28.0, 1.0), ("A", "SWE", "Open", 30.0, 2.0)]);

        let ranking = generate_full_ranking(&rating_tracker, Z);

        assert_eq!(ranking.entries[0].first_name, "A");
        assert_abs_diff_eq!(ranking.entries[0].conservative_score, 28.3168, epsilon = 1e-3);
        assert_abs_diff_eq!(ranking.entries[1].conservative_score, 27.1584, epsilon = 1e-3);
        assert_eq!(ranking.entries[0].combined_rank, 1);
        assert_eq!(ranking.entries[1].category_rank, 2);
        assert_abs_diff_eq!(ranking.entries[0].percentage_of_best, 100.0);
        assert_abs_diff_eq!(ranking.entries[1].percentage_of_best, 27.1584 / 28.3168 * 100.0, epsilon = 1e-2);
    }

    #[test]
    fn test_category_and_combined_ranks() {
        let rating_tracker = tracker(&[
            ("O1", "SWE", "Open", 40.0, 1.0),
            ("P1", "SWE", "Production", 35.0, 1.0),
            ("O2", "SWE", "Open", 30.0, 1.0),
            ("P2", "SWE", "Production", 38.0, 1.0),
            ("O3", "SWE", "Open", 20.0, 1.0),
        ]);

        let ranking = generate_full_ranking(&rating_tracker, Z);
        let order = ranking.iter().map(|e| e.first_name.as_str()).collect::<Vec<_>>();

        assert_eq!(order, vec!["O1", "P2", "P1", "O2", "O3"]);

        let ranks = ranking
            .iter()
            .map(|e| (e.combined_rank, e.category_rank))
            .collect::<Vec<_>>();
        assert_eq!(ranks, vec![(1, 1), (2, 1), (3, 2), (4, 2), (5, 3)]);

        let categories = ranking.by_category();
        assert_eq!(categories.keys().copied().collect::<Vec<_>>(), vec!["Open", "Production"]);
        assert_eq!(categories["Open"].len(), 3);
        assert_eq!(
            categories["Production"]
                .iter()
                .map(|e| e.category_rank)
                .collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_categories_follow_best_player_not_creation() {
        let rating_tracker = tracker(&[
            ("P1", "SWE", "Production", 20.0, 1.0),
            ("O1", "SWE", "Open", 40.0, 1.0),
        ]);

        let ranking = generate_full_ranking(&rating_tracker, Z);

        assert_eq!(
            ranking.by_category().keys().copied().collect::<Vec<_>>(),
            vec!["Open", "Production"]
        );
    }

    #[test]
    fn test_ties_keep_creation_order() {
        let rating_tracker = tracker(&[
            ("Zed", "SWE", "Open", 30.0, 2.0),
            ("Adam", "SWE", "Open", 30.0, 2.0),
            ("Mia", "SWE", "Open", 30.0, 2.0),
        ]);

        let ranking = generate_full_ranking(&rating_tracker, Z);
        let order = ranking.iter().map(|e| e.first_name.as_str()).collect::<Vec<_>>();

        assert_eq!(order, vec!["Zed", "Adam", "Mia"]);
        assert_eq!(
            ranking.iter().map(|e| e.category_rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_scores_non_increasing_with_rank() {
        let rating_tracker = tracker(&[
            ("A", "SWE", "Open", 12.0, 3.0),
            ("B", "SWE", "Standard", 33.0, 8.0),
            ("C", "NOR", "Open", 27.0, 1.5),
            ("D", "SWE", "Open", 19.0, 0.5),
            ("E", "FIN", "Standard", 40.0, 20.0),
        ]);

        let ranking = generate_full_ranking(&rating_tracker, Z);

        for pair in ranking.entries.windows(2) {
            assert!(pair[0].conservative_score >= pair[1].conservative_score);
        }
        for (_, entries) in ranking.by_category() {
            let ranks = entries.iter().map(|e| e.category_rank).collect::<Vec<_>>();
            assert_eq!(ranks, (1..=entries.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_region_filter_ranks_contiguously() {
        let rating_tracker = tracker(&[
            ("A", "SWE", "Open", 30.0, 1.0),
            ("B", "NOR", "Open", 35.0, 1.0),
            ("C", "swe", "Open", 25.0, 1.0),
        ]);

        let ranking = generate_ranking(&rating_tracker, Z, in_region("SWE"));

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.entries[0].first_name, "A");
        assert_eq!(ranking.entries[0].combined_rank, 1);
        assert_eq!(ranking.entries[1].combined_rank, 2);
        assert_eq!(ranking.entries[1].category_rank, 2);
        // Filtering never touches ratings
        assert_eq!(rating_tracker.len(), 3);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let rating_tracker = tracker(&[
            ("A", "SWE", "Open", 30.0, 1.0),
            ("B", "SWE", "Production Optics", 28.0, 4.0),
        ]);

        let first = generate_full_ranking(&rating_tracker, Z);
        let second = generate_full_ranking(&rating_tracker, Z);

        assert_eq!(first, second);
    }

    #[test]
    fn test_percentage_of_best_guards_non_positive_best() {
        assert_eq!(percentage_of_best(-2.0, -1.0), 0.0);
        assert_eq!(percentage_of_best(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(percentage_of_best(15.0, 20.0), 75.0);
    }

    #[test]
    fn test_empty_tracker() {
        let rating_tracker = RatingTracker::new(25.0, 29.7);

        assert!(generate_full_ranking(&rating_tracker, Z).is_empty());
    }
}
