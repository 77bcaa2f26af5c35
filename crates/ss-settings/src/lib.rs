pub mod config;
mod store;

pub use config::{CompanionSettings, Settings};
pub use store::{SettingsStore, SettingsStoreError};
