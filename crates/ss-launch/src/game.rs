use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use ss_auth::LaunchCredentials;
use ss_settings::{CompanionSettings, Settings};
use tokio::process::Command;
use tracing::{info, instrument};

use crate::errors::{LaunchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Game process spawned
    Started,
    /// Native Linux run pointed at the Windows build: settings are ready, but the game
    /// has to be started through Wine/Proton instead
    SetupOnly,
}

/// Arguments that make the game log in with an exchange code instead of the Epic launcher
pub fn launch_args(creds: &LaunchCredentials, extra: &[OsString]) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-AUTH_LOGIN=unused".to_string(),
        format!("-AUTH_PASSWORD={}", creds.exchange_code),
        "-AUTH_TYPE=exchangecode".to_string(),
        "-epicapp=Sugar".to_string(),
        "-epicenv=Prod".to_string(),
        "-EpicPortal".to_string(),
        "-epicusername=\"\"".to_string(),
        format!("-epicuserid={}", creds.account_id),
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.extend(extra.iter().cloned());
    args
}

fn is_windows_exe(os: &str, game_path: &Path) -> bool {
    os == "linux"
        && game_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

/// Spawns the game and, if configured, the companion process
#[derive(Debug, Clone)]
pub struct GameLauncher {
    os: &'static str,
}

impl Default for GameLauncher {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS,
        }
    }
}

impl GameLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher that behaves as if running on `os`
    pub fn for_os(os: &'static str) -> Self {
        Self { os }
    }

    /// Start the game without waiting for it to exit
    #[instrument(skip(self, settings, creds, extra))]
    pub fn launch_game(
        &self,
        settings: &Settings,
        creds: &LaunchCredentials,
        extra: &[OsString],
    ) -> Result<LaunchOutcome> {
        let game_path = settings
            .game_path
            .as_deref()
            .ok_or(LaunchError::GamePathMissing)?;

        if is_windows_exe(self.os, game_path) {
            info!("Game path is a Windows executable, skipping native launch");
            return Ok(LaunchOutcome::SetupOnly);
        }

        info!(game = %game_path.display(), "Launching Rocket League");
        Command::new(game_path)
            .args(launch_args(creds, extra))
            .spawn()
            .map_err(|source| LaunchError::SpawnFailed {
                what: "Rocket League",
                path: game_path.to_path_buf(),
                source,
            })?;

        info!("Rocket League process started");
        Ok(LaunchOutcome::Started)
    }

    /// Wait the configured delay, then start the companion.
    ///
    /// Returns `Ok(false)` when the companion is disabled or has no path.
    #[instrument(skip(self, companion))]
    pub async fn launch_companion(&self, companion: &CompanionSettings) -> Result<bool> {
        let path = match (companion.enabled, &companion.path) {
            (true, Some(path)) => path,
            _ => {
                info!("Companion is not enabled or path is not set");
                return Ok(false);
            }
        };

        let delay = Duration::from_secs(companion.launch_delay_secs);
        info!("Waiting {:?} before launching companion", delay);
        tokio::time::sleep(delay).await;

        Command::new(path)
            .spawn()
            .map_err(|source| LaunchError::SpawnFailed {
                what: "BakkesMod",
                path: path.clone(),
                source,
            })?;

        info!(companion = %path.display(), "Companion process started");
        Ok(true)
    }
}
