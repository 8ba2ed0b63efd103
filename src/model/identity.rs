use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    data::match_structs::ParticipantResult,
    model::{division, error::ParticipantDefect}
};

/// Region recorded for participants whose results carry none.
pub const UNKNOWN_REGION: &str = "Unknown";

const KEY_SEPARATOR: &str = "|";

/// Stable lookup key for one competitor in one division.
///
/// Built from first name, last name, region and the *normalized* division, each
/// case-folded with whitespace runs collapsed to `_` and `+`/`-` spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlayerKey(String);

impl PlayerKey {
    /// Resolves a key from raw participant fields. The division is normalized first.
    pub fn resolve(first_name: &str, last_name: &str, region: &str, raw_division: &str) -> PlayerKey {
        Self::from_normalized(first_name, last_name, region, &division::normalize(raw_division))
    }

    pub fn from_normalized(first_name: &str, last_name: &str, region: &str, division: &str) -> PlayerKey {
        PlayerKey(
            [first_name, last_name, region, division]
                .iter()
                .map(|part| key_part(part))
                .join(KEY_SEPARATOR)
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn key_part(part: &str) -> String {
    part.split_whitespace()
        .join("_")
        .to_lowercase()
        .replace('+', "plus")
        .replace('-', "minus")
}

/// Who a rating belongs to. The alias and raw division are metadata only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerIdentity {
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub region: String,
    /// Canonical division, part of the key
    pub division: String,
    /// Division label as first seen for this player
    pub raw_division: String
}

impl PlayerIdentity {
    /// Extracts an identity from a result row. First and last name are required.
    pub fn from_result(result: &ParticipantResult) -> Result<PlayerIdentity, ParticipantDefect> {
        let first_name = required(&result.first_name, "first_name")?;
        let last_name = required(&result.last_name, "last_name")?;
        let region = non_blank(&result.region).unwrap_or(UNKNOWN_REGION);
        let raw_division = non_blank(&result.division).unwrap_or(division::UNKNOWN);

        Ok(PlayerIdentity {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            alias: non_blank(&result.alias).map(str::to_string),
            region: region.to_string(),
            division: division::normalize(raw_division),
            raw_division: raw_division.to_string()
        })
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey::from_normalized(&self.first_name, &self.last_name, &self.region, &self.division)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ParticipantDefect> {
    non_blank(value).ok_or(ParticipantDefect::MissingField(field))
}
