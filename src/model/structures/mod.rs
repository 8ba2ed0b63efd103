pub mod match_level;
pub mod player_rating;
pub mod processing;
pub mod ranking_entry;
