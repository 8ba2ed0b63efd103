use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// One scraped match. Field names follow the scraper's JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "match_id", default = "unknown_match_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "match_title", default)]
    pub title: Option<String>,
    /// ISO-8601 with an offset, e.g. `2024-05-18T08:00:00Z`.
    /// Kept raw so an unparseable date is reported per match instead of failing the whole file.
    #[serde(rename = "match_date", default)]
    pub date: String,
    /// Competition tier tag, e.g. `Level III`
    #[serde(rename = "match_level", default)]
    pub level: Option<String>,
    #[serde(rename = "combined_results", default)]
    pub results: Vec<ParticipantResult>
}

impl MatchRecord {
    pub fn parse_date(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(self.date.trim())
    }
}

/// A single competitor's finish in a match. Every field is optional so that
/// incomplete rows can be detected and skipped individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantResult {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub alias: Option<String>,
    pub region: Option<String>,
    /// Raw division label as printed in the results
    pub division: Option<String>,
    /// Match percentage relative to the winner
    #[serde(rename = "match_percentage")]
    pub score: Option<f64>
}

fn unknown_match_id() -> String {
    "unknown".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string()
    })
}
