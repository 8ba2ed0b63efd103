use thiserror::Error;

/// Errors surfaced by a [`crate::model::rating_model::RatingModel`] implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RatingModelError {
    #[error("expected {expected} ratings from the model, received {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("{teams} teams were submitted with {scores} scores")]
    ScoreCountMismatch { teams: usize, scores: usize },

    #[error("model produced an invalid rating (mu: {mu}, sigma: {sigma})")]
    InvalidRating { mu: f64, sigma: f64 },

    #[error("rating model failed: {0}")]
    Model(String)
}

/// Why a single participant row was left out of a match.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParticipantDefect {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("score {0} is not a finite number")]
    InvalidScore(f64),

    #[error("same player as participant #{0}")]
    Duplicate(usize)
}

/// Recoverable failures while processing a batch of matches.
/// None of these abort a run; they are logged and collected in the report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProcessingError {
    #[error("match {match_id} skipped: {reason}")]
    MalformedMatch { match_id: String, reason: String },

    #[error("match {match_id}, participant #{index} skipped: {defect}")]
    MalformedParticipant {
        match_id: String,
        index: usize,
        #[source]
        defect: ParticipantDefect
    },

    #[error("match {match_id} discarded: rating update failed")]
    RatingUpdateFailure {
        match_id: String,
        #[source]
        source: RatingModelError
    }
}

impl ProcessingError {
    pub fn match_id(&self) -> &str {
        match self {
            ProcessingError::MalformedMatch { match_id, .. }
            | ProcessingError::MalformedParticipant { match_id, .. }
            | ProcessingError::RatingUpdateFailure { match_id, .. } => match_id
        }
    }
}

/// Rejected engine configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("percentile must lie strictly between 0 and 100, got {0}")]
    Percentile(f64),

    #[error("starting sigma must be a positive number, got {0}")]
    StartingSigma(f64),

    #[error("starting mu must be a finite number, got {0}")]
    StartingMu(f64),

    #[error("max sigma multiplier must be at least 1, got {0}")]
    MaxSigmaMultiplier(f64),

    #[error("decay parameter `{name}` must be a non-negative number, got {value}")]
    DecayParameter { name: &'static str, value: f64 }
}
