use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::config::Settings;

pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Reads and writes the launcher's settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/settings.toml` for the current platform
    pub fn in_default_location() -> Result<Self, SettingsStoreError> {
        Ok(Self::new(Self::default_dir()?.join(SETTINGS_FILE_NAME)))
    }

    pub fn default_dir() -> Result<PathBuf, SettingsStoreError> {
        let proj_dirs = ProjectDirs::from("com", "slipstream", "slipstream").ok_or_else(|| {
            error!("Failed to determine project directories - this usually indicates an unsupported OS or missing home directory");
            SettingsStoreError::ProjectDirectoriesUnavailable
        })?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the settings file, also used for the log file
    pub fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Load settings, falling back to defaults when the file doesn't exist yet
    #[instrument(skip(self), fields(path = %self.path.display()), level = "debug")]
    pub async fn load(&self) -> Result<Settings, SettingsStoreError> {
        if tokio::fs::metadata(&self.path).await.is_err() {
            info!(
                "Settings file doesn't exist, using defaults: {}",
                self.path.display()
            );
            return Ok(Settings::default());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .context("Failed to read settings file")
            .map_err(|e| {
                error!("Failed to read settings file {}: {}", self.path.display(), e);
                SettingsStoreError::FileReadFailed {
                    path: self.path.clone(),
                    source: e,
                }
            })?;

        let settings: Settings = toml::from_str(&content)
            .context("Failed to parse settings file")
            .map_err(|e| {
                error!("Failed to parse settings file {}: {}", self.path.display(), e);
                SettingsStoreError::ParsingFailed {
                    path: self.path.clone(),
                    source: e,
                }
            })?;

        debug!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    /// Write settings atomically: temp file first, then rename over the old one
    #[instrument(skip(self, settings), fields(path = %self.path.display()), level = "debug")]
    pub async fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        let dir = self.dir().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .context("Failed to create settings directory")
            .map_err(|e| {
                error!("Failed to create settings directory {}: {}", dir.display(), e);
                SettingsStoreError::DirectoryCreationFailed {
                    path: dir.clone(),
                    source: e,
                }
            })?;

        let toml = toml::to_string_pretty(settings)
            .context("Failed to serialize settings to TOML")
            .map_err(|e| SettingsStoreError::SerializationFailed { source: e })?;

        let temp_path = self.path.with_extension("toml.tmp");
        tokio::fs::write(&temp_path, toml)
            .await
            .context("Failed to write temporary settings file")
            .map_err(|e| SettingsStoreError::FileWriteFailed {
                path: temp_path.clone(),
                source: e,
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .context("Failed to replace settings file")
            .map_err(|e| {
                error!("Failed to write settings file {}: {}", self.path.display(), e);
                SettingsStoreError::FileWriteFailed {
                    path: self.path.clone(),
                    source: e,
                }
            })?;

        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}


#[derive(Debug, Error)]
pub enum SettingsStoreError {
    #[error(
        "Project directories are unavailable - this usually indicates an unsupported OS or missing home directory"
    )]
    ProjectDirectoriesUnavailable,

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to read settings file '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write settings file '{path}': {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to parse settings file '{path}': {source}")]
    ParsingFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to serialize settings: {source}")]
    SerializationFailed {
        #[source]
        source: anyhow::Error,
    },
}
