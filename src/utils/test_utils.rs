use chrono::{DateTime, Duration, FixedOffset};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    data::match_structs::{MatchRecord, ParticipantResult},
    model::{identity::PlayerIdentity, structures::player_rating::PlayerRating}
};

const REGIONS: [&str; 3] = ["SWE", "NOR", "FIN"];
const RAW_DIVISIONS: [&str; 7] = [
    "Open",
    "open+",
    "Production Optics-",
    "Standard",
    "Classic",
    "PCC",
    "Revolver Minor"
];
const LEVEL_TAGS: [&str; 6] = ["Level II", "Level III", "L4", "5", "level 2", "Club night"];

/// Parses an RFC 3339 timestamp. Panics on invalid input.
pub fn timestamp(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap_or_else(|e| panic!("invalid test timestamp {s:?}: {e}"))
}

pub fn generate_result(first_name: &str, last_name: &str, region: &str, division: &str, score: f64) -> ParticipantResult {
    ParticipantResult {
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        alias: None,
        region: Some(region.to_string()),
        division: Some(division.to_string()),
        score: Some(score)
    }
}

pub fn generate_match(id: &str, date: &str, level: Option<&str>, results: Vec<ParticipantResult>) -> MatchRecord {
    MatchRecord {
        id: id.to_string(),
        title: Some(format!("Match {id}")),
        date: date.to_string(),
        level: level.map(str::to_string),
        results
    }
}

pub fn generate_identity(first_name: &str, last_name: &str, region: &str, division: &str) -> PlayerIdentity {
    PlayerIdentity::from_result(&generate_result(first_name, last_name, region, division, 0.0))
        .unwrap_or_else(|e| panic!("invalid test identity: {e}"))
}

pub fn generate_player_rating(
    first_name: &str,
    last_name: &str,
    mu: f64,
    sigma: f64,
    last_match_date: Option<DateTime<FixedOffset>>
) -> PlayerRating {
    let mut rating = PlayerRating::new(generate_identity(first_name, last_name, "SWE", "Open"), mu, sigma);
    rating.last_match_date = last_match_date;
    if last_match_date.is_some() {
        rating.matches_played = 1;
    }

    rating
}

/// Generates `n_matches` weekly matches drawn from a pool of `n_players` competitors.
///
/// Output is fully determined by `seed`. Matches are in chronological order, each with
/// between 2 and 8 distinct participants (fewer if the pool is smaller). The winner scores
/// 100, everybody else somewhere below. Division labels and level tags come in a mix of
/// spellings, including one level tag that is not recognized.
pub fn generate_corpus(seed: u64, n_matches: usize, n_players: usize) -> Vec<MatchRecord> {
    if n_players < 2 {
        panic!("A corpus needs at least 2 players");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let start = timestamp("2023-01-07T08:00:00+01:00");

    let players = (0..n_players)
        .map(|i| {
            (
                format!("First{i}"),
                format!("Last{i}"),
                REGIONS[rng.random_range(0..REGIONS.len())],
                RAW_DIVISIONS[rng.random_range(0..RAW_DIVISIONS.len())]
            )
        })
        .collect::<Vec<_>>();

    (0..n_matches)
        .map(|m| {
            let date = start + Duration::days(7 * m as i64) + Duration::hours(rng.random_range(0..10));
            let level = LEVEL_TAGS[rng.random_range(0..LEVEL_TAGS.len())];
            let n_participants = rng.random_range(2..=n_players.min(8));

            // Partial Fisher-Yates for distinct participants
            let mut pool = (0..n_players).collect::<Vec<_>>();
            for i in 0..n_participants {
                let j = rng.random_range(i..pool.len());
                pool.swap(i, j);
            }

            let results = pool[..n_participants]
                .iter()
                .enumerate()
                .map(|(place, &p)| {
                    let (first, last, region, division) = &players[p];
                    let score = if place == 0 {
                        100.0
                    } else {
                        rng.random_range(10.0..99.9)
                    };

                    generate_result(first, last, region, division, score)
                })
                .collect();

            generate_match(&m.to_string(), &date.to_rfc3339(), Some(level), results)
        })
        .collect()
}
