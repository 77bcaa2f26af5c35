use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No game path configured")]
    GamePathMissing,

    #[error("Failed to start {what} at '{path}': {source}")]
    SpawnFailed {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Update check failed: {0}")]
    UpdateCheck(#[from] reqwest::Error),

    #[error("Release feed returned status {0}")]
    UpdateStatus(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
