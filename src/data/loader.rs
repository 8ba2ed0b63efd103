use std::{fs, path::Path};

use tracing::{debug, info, warn};

use crate::data::{match_structs::MatchRecord, DataError};

/// Loads every `*.json` match file in `dir`, one match per file.
///
/// Files that cannot be read or parsed are logged and skipped, as are matches without
/// results. The returned matches are in chronological order; see [`sort_chronologically`].
/// Only an unreadable `dir` is an error.
pub fn load_matches(dir: impl AsRef<Path>) -> Result<Vec<MatchRecord>, DataError> {
    let dir = dir.as_ref();

    let mut paths = fs::read_dir(dir)
        .map_err(DataError::io(dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect::<Vec<_>>();

    // read_dir order is platform dependent
    paths.sort();

    let mut matches = Vec::with_capacity(paths.len());
    for path in &paths {
        match load_match(path) {
            Ok(record) if record.results.is_empty() => {
                debug!(path = %path.display(), match_id = %record.id, "Skipping match without results")
            }
            Ok(record) => matches.push(record),
            Err(e) => warn!(path = %path.display(), error = ?e, "Skipping unreadable match file")
        }
    }

    sort_chronologically(&mut matches);

    info!("Loaded {} matches from {} files in {}", matches.len(), paths.len(), dir.display());

    Ok(matches)
}

pub fn load_match(path: impl AsRef<Path>) -> Result<MatchRecord, DataError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(DataError::io(path))?;

    serde_json::from_str(&content).map_err(DataError::json(path))
}

/// Stable sort by match date. Matches with unparseable dates go last, in their original
/// order, so that processing reports them instead of losing them.
pub fn sort_chronologically(matches: &mut [MatchRecord]) {
    matches.sort_by_cached_key(|m| {
        let date = m.parse_date().ok();
        (date.is_none(), date)
    });
}
