use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use openskill::rating::Rating;
use tracing::{debug, error, info, warn};

use crate::{
    data::match_structs::MatchRecord,
    model::{
        config::EngineConfig,
        decay::{DecayStats, DecayTracker},
        error::{ParticipantDefect, ProcessingError, RatingModelError},
        identity::{PlayerIdentity, PlayerKey},
        ranking::{generate_full_ranking, generate_ranking, Ranking},
        rating_model::{BradleyTerryPartModel, RatingModel},
        rating_tracker::RatingTracker,
        structures::{match_level::MatchLevel, player_rating::PlayerRating, processing::ProcessingReport}
    },
    utils::progress_utils::progress_bar
};

/// Owns the rating store for one run and feeds matches through the rating model.
pub struct RatingEngine<M: RatingModel = BradleyTerryPartModel> {
    pub config: EngineConfig,
    pub model: M,
    pub rating_tracker: RatingTracker,
    pub decay_tracker: DecayTracker,
    /// Start time of the newest match rated so far
    pub latest_match_time: Option<DateTime<FixedOffset>>
}

impl RatingEngine<BradleyTerryPartModel> {
    /// An engine using openskill's Bradley-Terry partial pairing model with the configured kappa.
    pub fn from_config(config: EngineConfig) -> RatingEngine<BradleyTerryPartModel> {
        RatingEngine::new(config, BradleyTerryPartModel::new(config.kappa))
    }
}

impl<M: RatingModel> RatingEngine<M> {
    pub fn new(config: EngineConfig, model: M) -> RatingEngine<M> {
        RatingEngine {
            config,
            model,
            rating_tracker: RatingTracker::new(config.starting_mu, config.starting_sigma),
            decay_tracker: DecayTracker::new(config.decay),
            latest_match_time: None
        }
    }

    /// Rates `matches` in the given order. Matches are expected to be sorted chronologically.
    ///
    /// Never fails as a whole: broken matches and participants are logged, skipped and
    /// collected in the returned report.
    pub fn process(&mut self, matches: &[MatchRecord]) -> ProcessingReport {
        let mut report = ProcessingReport::default();
        let bar = progress_bar(matches.len() as u64, "Processing matches".to_string());

        for record in matches {
            match self.process_match(record, &mut report) {
                Ok(()) => report.matches_processed += 1,
                Err(e) => {
                    match &e {
                        ProcessingError::RatingUpdateFailure { source, .. } => {
                            error!(match_id = %record.id, error = %source, "{}", e)
                        }
                        _ => warn!(match_id = %record.id, "{}", e)
                    }
                    report.record(e);
                }
            }

            bar.inc(1);
        }

        bar.finish_and_clear();

        info!(
            processed = report.matches_processed,
            skipped = report.matches_skipped,
            failed = report.matches_failed,
            participants_skipped = report.participants_skipped,
            unknown_levels = report.unknown_levels,
            out_of_order = report.out_of_order,
            players = self.rating_tracker.len(),
            "Finished processing {} matches",
            matches.len()
        );

        report
    }

    /// # Match processing
    ///
    /// 1. Parse the start time. An unparseable date skips the match before anything changes.
    /// 2. Validate participants. Defective rows are skipped; a match left without
    ///    participants is skipped entirely.
    /// 3. Resolve the competition level, falling back to the lowest tier.
    /// 4. Decay every known player up to the match start.
    /// 5. Rate all participants in one model call, each participant being their own team.
    /// 6. Write the results back. If the model fails, nothing is written.
    fn process_match(&mut self, record: &MatchRecord, report: &mut ProcessingReport) -> Result<(), ProcessingError> {
        let match_time = record.parse_date().map_err(|e| ProcessingError::MalformedMatch {
            match_id: record.id.clone(),
            reason: format!("unparseable date {:?} ({})", record.date, e)
        })?;

        let participants = self.validate_participants(record, report);
        if participants.is_empty() {
            return Err(ProcessingError::MalformedMatch {
                match_id: record.id.clone(),
                reason: "no valid participants".to_string()
            });
        }

        let level = self.match_level(record, report);

        if let Some(latest) = self.latest_match_time {
            if match_time < latest {
                warn!(
                    match_id = %record.id,
                    match_date = %match_time,
                    latest = %latest,
                    "Match is older than a previously processed match"
                );
                report.out_of_order += 1;
            }
        }

        self.decay_tracker
            .decay_all(&mut self.rating_tracker, match_time, &mut report.decay);

        let beta = level.beta(self.config.starting_mu);

        let mut keys = Vec::with_capacity(participants.len());
        let mut teams = Vec::with_capacity(participants.len());
        let mut scores = Vec::with_capacity(participants.len());
        for (identity, score) in participants {
            let player_rating = self.rating_tracker.get_or_create(identity);

            keys.push(player_rating.key.clone());
            teams.push(vec![player_rating.rating()]);
            scores.push(score);
        }

        let results = self
            .model
            .rate(&teams, &scores, beta)
            .and_then(|results| validate_results(results, teams.len()))
            .map_err(|source| ProcessingError::RatingUpdateFailure {
                match_id: record.id.clone(),
                source
            })?;

        let updates: Vec<(PlayerKey, Rating)> = keys.into_iter().zip(results).collect();
        let written = self.rating_tracker.insert_or_update(&updates, match_time);

        self.latest_match_time = Some(self.latest_match_time.map_or(match_time, |t| t.max(match_time)));

        debug!(
            match_id = %record.id,
            level = %level,
            beta,
            participants = written,
            "Rated match"
        );

        Ok(())
    }

    /// Returns the usable participants with their scores, in input order.
    /// Every rejected row is recorded in `report`.
    fn validate_participants(&self, record: &MatchRecord, report: &mut ProcessingReport) -> Vec<(PlayerIdentity, f64)> {
        let mut participants = Vec::with_capacity(record.results.len());
        let mut seen: HashMap<PlayerKey, usize> = HashMap::new();

        for (index, result) in record.results.iter().enumerate() {
            let validated = PlayerIdentity::from_result(result).and_then(|identity| {
                let score = match result.score {
                    None => return Err(ParticipantDefect::MissingField("match_percentage")),
                    Some(score) if !score.is_finite() => return Err(ParticipantDefect::InvalidScore(score)),
                    Some(score) => score
                };

                match seen.get(&identity.key()) {
                    Some(&first) => Err(ParticipantDefect::Duplicate(first)),
                    None => Ok((identity, score))
                }
            });

            match validated {
                Ok((identity, score)) => {
                    seen.insert(identity.key(), index);
                    participants.push((identity, score));
                }
                Err(defect) => {
                    let e = ProcessingError::MalformedParticipant {
                        match_id: record.id.clone(),
                        index,
                        defect
                    };
                    warn!(match_id = %record.id, "{}", e);
                    report.record(e);
                }
            }
        }

        participants
    }

    fn match_level(&self, record: &MatchRecord, report: &mut ProcessingReport) -> MatchLevel {
        match record.level.as_deref().and_then(MatchLevel::parse) {
            Some(level) => level,
            None => {
                warn!(
                    match_id = %record.id,
                    level = ?record.level,
                    "Unknown match level, rating as {}",
                    MatchLevel::LOWEST
                );
                report.unknown_levels += 1;
                MatchLevel::LOWEST
            }
        }
    }

    /// Decays every player relative to `reference_time`, e.g. "now" for a current snapshot.
    /// Separate from match processing; calling it twice with the same time decays twice.
    pub fn apply_decay_as_of(&mut self, reference_time: DateTime<FixedOffset>) -> DecayStats {
        let mut stats = DecayStats::default();
        self.decay_tracker
            .decay_all(&mut self.rating_tracker, reference_time, &mut stats);

        info!(
            players_affected = stats.players_affected,
            max_days_inactive = stats.max_days_inactive,
            "Applied decay as of {}",
            reference_time
        );

        stats
    }

    pub fn ranking(&self) -> Ranking {
        generate_full_ranking(&self.rating_tracker, self.config.z)
    }

    pub fn ranking_filtered<F>(&self, filter: F) -> Ranking
    where
        F: Fn(&PlayerRating) -> bool
    {
        generate_ranking(&self.rating_tracker, self.config.z, filter)
    }
}

fn validate_results(results: Vec<Rating>, expected: usize) -> Result<Vec<Rating>, RatingModelError> {
    if results.len() != expected {
        return Err(RatingModelError::ArityMismatch {
            expected,
            actual: results.len()
        });
    }

    if let Some(invalid) = results
        .iter()
        .find(|r| !r.mu.is_finite() || !r.sigma.is_finite() || r.sigma < 0.0)
    {
        return Err(RatingModelError::InvalidRating {
            mu: invalid.mu,
            sigma: invalid.sigma
        });
    }

    Ok(results)
}
