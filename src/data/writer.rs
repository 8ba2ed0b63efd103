use std::{
    fs,
    path::{Path, PathBuf}
};

use serde::Serialize;
use tracing::info;

use crate::{data::DataError, model::ranking::Ranking};

/// Writes `{prefix}_combined.json` plus one `{prefix}_{division}.json` per division.
/// Returns the written paths, combined file first.
pub fn write_rankings(dir: impl AsRef<Path>, prefix: &str, ranking: &Ranking) -> Result<Vec<PathBuf>, DataError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(DataError::io(dir))?;

    let mut written = Vec::new();

    let combined = dir.join(format!("{prefix}_combined.json"));
    write_json(&combined, ranking)?;
    info!("Saved {} players to {}", ranking.len(), combined.display());
    written.push(combined);

    for (division, entries) in ranking.by_category() {
        let path = dir.join(format!("{prefix}_{}.json", safe_category_name(division)));
        write_json(&path, &entries)?;
        info!("Saved {} players for division {} to {}", entries.len(), division, path.display());
        written.push(path);
    }

    Ok(written)
}

/// File-name friendly division name, e.g. `Production Optics` -> `production_optics`.
/// Only `[a-z0-9_]` survives; path separators and other characters become `_`.
pub fn safe_category_name(division: &str) -> String {
    division
        .replace('+', "plus")
        .replace('-', "minus")
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' => c,
            _ => '_'
        })
        .collect()
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DataError> {
    let json = serde_json::to_string_pretty(value).map_err(DataError::json(path))?;
    fs::write(path, json).map_err(DataError::io(path))
}
