use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::data::match_structs::MatchRecord;

pub const UNKNOWN: &str = "Unknown";
pub const OPEN: &str = "Open";
pub const STANDARD: &str = "Standard";
pub const PRODUCTION: &str = "Production";
pub const PRODUCTION_OPTICS: &str = "Production Optics";
pub const REVOLVER: &str = "Revolver";
pub const CLASSIC: &str = "Classic";
pub const PISTOL_CALIBER_CARBINE: &str = "Pistol Caliber Carbine";

/// Trailing tokens marking a sub-variant of a division. Checked once each, in order.
const MODIFIER_SUFFIXES: [&str; 4] = ["+", "-", "plus", "minus"];

/// Labels shorter than this never match by being contained in a synonym key.
const MIN_REVERSE_MATCH_LEN: usize = 3;

/// Known spellings of each division, lower-cased.
const SYNONYMS: &[(&str, &str)] = &[
    ("open", OPEN),
    ("semi-auto open", OPEN),
    ("semiminusauto_open", OPEN),
    ("semi_auto_open", OPEN),
    ("standard", STANDARD),
    ("semi-auto standard", STANDARD),
    ("semiminusauto_standard", STANDARD),
    ("semi_auto_standard", STANDARD),
    ("standard_manual", STANDARD),
    ("production", PRODUCTION),
    ("revolver", REVOLVER),
    ("classic", CLASSIC),
    ("pistol caliber carbine", PISTOL_CALIBER_CARBINE),
    ("pistol_caliber_carbine", PISTOL_CALIBER_CARBINE),
    ("pistol caliber carbine optics", PISTOL_CALIBER_CARBINE),
    ("pistol_caliber_carbine_optics", PISTOL_CALIBER_CARBINE),
    ("pistol caliber carbine iron", PISTOL_CALIBER_CARBINE),
    ("pistol_caliber_carbine_iron", PISTOL_CALIBER_CARBINE),
    ("pcc", PISTOL_CALIBER_CARBINE),
    ("production optics", PRODUCTION_OPTICS),
    ("production_optics", PRODUCTION_OPTICS),
    ("production optics light", PRODUCTION_OPTICS),
    ("production_optics_light", PRODUCTION_OPTICS),
    ("modified", OPEN),
    ("custom", OPEN),
    ("semi-auto limited", STANDARD),
    ("semiminusauto_limited", STANDARD)
];

/// Last-resort keyword rules, in priority order. Every keyword of a rule must be present.
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (&["open"], OPEN),
    (&["standard"], STANDARD),
    (&["production", "optics"], PRODUCTION_OPTICS),
    (&["production"], PRODUCTION),
    (&["revolver"], REVOLVER),
    (&["classic"], CLASSIC),
    (&["pistol", "carbine"], PISTOL_CALIBER_CARBINE),
    (&["carbine"], PISTOL_CALIBER_CARBINE)
];

/// Maps a free-text division label onto the canonical division taxonomy.
///
/// Lookup order:
/// 1. exact synonym match on the lower-cased label with modifier suffixes removed
/// 2. the label contains a synonym (longest synonym wins)
/// 3. a synonym contains the label (shortest synonym wins)
/// 4. keyword rules in [`KEYWORD_RULES`] order
///
/// Labels that match nothing are returned trimmed but otherwise untouched.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNKNOWN.to_string();
    }

    let base = strip_modifiers(&trimmed.to_lowercase());
    if base.is_empty() {
        return trimmed.to_string();
    }

    exact_match(&base)
        .or_else(|| contained_match(&base))
        .or_else(|| keyword_match(&base))
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_string())
}

/// Normalizes an optional label, treating absence as [`UNKNOWN`].
pub fn normalize_opt(raw: Option<&str>) -> String {
    normalize(raw.unwrap_or_default())
}

fn strip_modifiers(label: &str) -> String {
    let mut base = label.trim();
    for suffix in MODIFIER_SUFFIXES {
        if let Some(stripped) = base.strip_suffix(suffix) {
            base = stripped.trim();
        }
    }

    base.to_string()
}

fn exact_match(base: &str) -> Option<&'static str> {
    SYNONYMS
        .iter()
        .find(|(key, _)| *key == base)
        .map(|(_, division)| *division)
}

fn contained_match(base: &str) -> Option<&'static str> {
    let forward = SYNONYMS
        .iter()
        .sorted_by(|(a, _), (b, _)| b.len().cmp(&a.len()))
        .find(|(key, _)| base.contains(key));

    if let Some((_, division)) = forward {
        return Some(*division);
    }

    if base.len() < MIN_REVERSE_MATCH_LEN {
        return None;
    }

    SYNONYMS
        .iter()
        .sorted_by_key(|(key, _)| key.len())
        .find(|(key, _)| key.contains(base))
        .map(|(_, division)| *division)
}

fn keyword_match(base: &str) -> Option<&'static str> {
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().all(|k| base.contains(k)))
        .map(|(_, division)| *division)
}

/// Raw and normalized division label counts over a set of matches.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DivisionStatistics {
    pub original_divisions: IndexMap<String, usize>,
    pub normalized_divisions: IndexMap<String, usize>
}

impl DivisionStatistics {
    pub fn total_original_variations(&self) -> usize {
        self.original_divisions.len()
    }

    pub fn total_normalized_divisions(&self) -> usize {
        self.normalized_divisions.len()
    }
}

/// Counts every participant's division label, before and after normalization.
pub fn division_statistics(matches: &[MatchRecord]) -> DivisionStatistics {
    let mut stats = DivisionStatistics::default();

    for result in matches.iter().flat_map(|m| m.results.iter()) {
        let original = result.division.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let normalized = normalize(&original);

        *stats.original_divisions.entry(original).or_default() += 1;
        *stats.normalized_divisions.entry(normalized).or_default() += 1;
    }

    stats
}
