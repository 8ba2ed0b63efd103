use crate::model::{decay::DecayStats, error::ProcessingError};

/// Outcome of one batch run. Every recoverable failure ends up here instead of aborting the run.
#[derive(Debug, Clone, Default)]
pub struct ProcessingReport {
    pub matches_processed: usize,
    /// Unparseable date or no valid participants
    pub matches_skipped: usize,
    /// Rating model failures; nothing was written back for these
    pub matches_failed: usize,
    pub participants_skipped: usize,
    /// Matches rated at the lowest tier because their level tag was missing or unrecognized
    pub unknown_levels: usize,
    /// Matches older than a match processed before them
    pub out_of_order: usize,
    pub decay: DecayStats,
    pub errors: Vec<ProcessingError>
}

impl ProcessingReport {
    pub fn record(&mut self, error: ProcessingError) {
        match error {
            ProcessingError::MalformedMatch { .. } => self.matches_skipped += 1,
            ProcessingError::MalformedParticipant { .. } => self.participants_skipped += 1,
            ProcessingError::RatingUpdateFailure { .. } => self.matches_failed += 1
        }

        self.errors.push(error);
    }

    pub fn total_matches(&self) -> usize {
        self.matches_processed + self.matches_skipped + self.matches_failed
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.unknown_levels == 0 && self.out_of_order == 0
    }
}
