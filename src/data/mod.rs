use std::path::PathBuf;

use thiserror::Error;

pub mod loader;
pub mod match_structs;
pub mod writer;

/// File system and JSON failures on the way in and out of the engine.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    }
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> DataError {
        let path = path.into();
        move |source| DataError::Io { path, source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> DataError {
        let path = path.into();
        move |source| DataError::Json { path, source }
    }
}
