use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPANION_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game_path: Option<PathBuf>,
    /// Refresh token or pending authorization code; empty until the first login
    pub epic_token: String,
    pub last_notified_version: Option<String>,
    pub companion: CompanionSettings,
}

/// Helper process started after the game (BakkesMod)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionSettings {
    pub enabled: bool,
    pub path: Option<PathBuf>,
    pub launch_delay_secs: u64,
    /// The user said no to the setup prompt; don't ask again
    pub setup_declined: bool,
}

impl Settings {
    /// Whether the companion setup prompt should be shown
    pub fn needs_companion_setup(&self) -> bool {
        self.game_path.is_some() && self.companion.path.is_none() && !self.companion.setup_declined
    }

    /// Fill in defaults that older files may lack. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        if self.companion.enabled && self.companion.launch_delay_secs == 0 {
            self.companion.launch_delay_secs = DEFAULT_COMPANION_DELAY_SECS;
            return true;
        }
        false
    }

    pub fn enable_companion(&mut self, path: PathBuf) {
        self.companion.path = Some(path);
        self.companion.enabled = true;
        self.companion.setup_declined = false;
        if self.companion.launch_delay_secs == 0 {
            self.companion.launch_delay_secs = DEFAULT_COMPANION_DELAY_SECS;
        }
    }

    pub fn decline_companion(&mut self) {
        self.companion.enabled = false;
        self.companion.setup_declined = true;
    }
}
