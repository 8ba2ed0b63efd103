use std::{
    fs,
    path::{Path, PathBuf},
    sync::Once
};

use ipsc_rating::data::match_structs::MatchRecord;

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fresh, empty directory under the system temp dir, unique per test binary and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ipsc-rating-it-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    dir
}

/// Writes each match to its own `match_{i}.json` in `dir`.
pub fn write_matches(dir: &Path, matches: &[MatchRecord]) {
    for (i, m) in matches.iter().enumerate() {
        fs::write(dir.join(format!("match_{i:03}.json")), serde_json::to_string(m).unwrap()).unwrap();
    }
}
