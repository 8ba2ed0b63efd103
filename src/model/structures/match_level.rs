use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Competition tier of a match. Higher tiers move ratings further per result.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display)]
pub enum MatchLevel {
    #[strum(to_string = "Level II")]
    Level2,
    #[strum(to_string = "Level III")]
    Level3,
    #[strum(to_string = "Level IV")]
    Level4,
    #[strum(to_string = "Level V")]
    Level5
}

impl MatchLevel {
    /// The level assumed when a tag is absent or unrecognized.
    pub const LOWEST: MatchLevel = MatchLevel::Level2;

    /// Parses tags such as `Level III`, `level 3`, `L3`, `III` or `3`.
    pub fn parse(tag: &str) -> Option<MatchLevel> {
        let lowered = tag.trim().to_lowercase();
        let stripped = lowered
            .strip_prefix("level")
            .or_else(|| lowered.strip_prefix('l'))
            .unwrap_or(&lowered)
            .trim();

        match stripped {
            "ii" | "2" => Some(MatchLevel::Level2),
            "iii" | "3" => Some(MatchLevel::Level3),
            "iv" | "4" => Some(MatchLevel::Level4),
            "v" | "5" => Some(MatchLevel::Level5),
            _ => None
        }
    }

    /// Divisor applied to the starting mu to obtain this level's beta.
    pub fn beta_divisor(&self) -> f64 {
        match self {
            MatchLevel::Level2 => 12.0,
            MatchLevel::Level3 => 6.0,
            MatchLevel::Level4 => 3.0,
            MatchLevel::Level5 => 1.5
        }
    }

    /// The scale parameter handed to the rating model for matches of this level.
    pub fn beta(&self, starting_mu: f64) -> f64 {
        starting_mu / self.beta_divisor()
    }
}
