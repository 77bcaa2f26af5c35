mod dialogs;
mod setup;
mod telemetry;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ss_auth::{
    AuthConfig, BrowserLauncher, CredentialPipeline, Dialogs, EpicAccountClient,
    InteractiveAuthorizer, PipelineError,
};
use ss_launch::update::{LATEST_RELEASE_URL, RELEASES_PAGE_URL};
use ss_launch::{GameLauncher, LaunchError, LaunchOutcome, UpdateChecker};
use ss_settings::{Settings, SettingsStore};
use tracing::{info, warn};
use url::Url;

use crate::dialogs::{SystemBrowser, TerminalDialogs};

const CURRENT_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Launch Rocket League with your Epic Games account, without the Epic launcher
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Forget the saved Epic token and log in again
    #[arg(long, default_value = "false")]
    reset_token: bool,

    /// Extra arguments passed through to Rocket League
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    game_args: Vec<OsString>,
}

/// Top-level failures, each rendered as one error dialog
enum Failure {
    Configuration(anyhow::Error),
    Authentication(PipelineError),
    Launch(LaunchError),
}

impl Failure {
    fn title(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Configuration Error",
            Self::Authentication(_) => "Authentication Failed",
            Self::Launch(_) => "Failed to Launch Rocket League",
        }
    }

    fn message(&self, settings_path: &str) -> String {
        match self {
            Self::Configuration(e) => format!(
                "Failed to load configuration.\n\n\
                 Please ensure that the program can read and write '{settings_path}', and that the file is not corrupted.\n\
                 If the problem persists, you can delete the file and it will be recreated.\n\n\
                 Details: {e:#}"
            ),
            Self::Authentication(e) => format!(
                "Authentication Failed.\n\n\
                 Your session may have expired or the authentication details are incorrect. \
                 The simplest fix is often to run Slipstream with --reset-token to log in from scratch.\n\n\
                 Details: {e}"
            ),
            Self::Launch(e) => format!(
                "Failed to Launch Rocket League.\n\n\
                 Please ensure the Rocket League path is correctly set in '{settings_path}' \
                 and that the game executable is not missing or corrupted.\n\n\
                 Details: {e}"
            ),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dialogs = TerminalDialogs;

    let store = match &cli.config {
        Some(path) => SettingsStore::new(path),
        None => match SettingsStore::in_default_location() {
            Ok(store) => store,
            Err(e) => {
                dialogs
                    .show_error("Configuration Error", &e.to_string())
                    .await;
                return ExitCode::FAILURE;
            }
        },
    };
    // Dropping the guard flushes the log file, so hold it for the whole run.
    let _guard = telemetry::init_subscriber(store.dir(), "info");

    match run(cli, &store, dialogs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            let message = failure.message(&store.path().display().to_string());
            dialogs.show_error(failure.title(), &message).await;
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, store: &SettingsStore, dialogs: TerminalDialogs) -> Result<(), Failure> {
    let mut settings = setup::load_settings(store, &dialogs)
        .await
        .map_err(Failure::Configuration)?;

    if cli.reset_token {
        info!("Discarding saved token");
        settings.epic_token.clear();
    }

    let config = AuthConfig::epic_launcher();
    let authorizer = InteractiveAuthorizer::new(
        config.login_url.clone(),
        Arc::new(dialogs),
        Arc::new(SystemBrowser),
    );
    let client = EpicAccountClient::new(config)
        .map_err(|e| Failure::Configuration(anyhow::Error::new(e)))?;
    let pipeline = CredentialPipeline::new(Arc::new(client), Arc::new(authorizer));

    let acquired = match pipeline.get_launch_credentials(&settings.epic_token).await {
        Ok(acquired) => acquired,
        Err(e) => {
            if let Some(token) = &e.token_to_persist {
                persist_token(store, &mut settings, token).await;
            }
            return Err(Failure::Authentication(e));
        }
    };
    persist_token(store, &mut settings, &acquired.token_to_persist).await;

    info!("Successfully authenticated");
    let launcher = GameLauncher::new();
    let outcome = launcher
        .launch_game(&settings, &acquired.credentials, &cli.game_args)
        .map_err(Failure::Launch)?;

    if outcome == LaunchOutcome::SetupOnly {
        dialogs
            .show_info(
                "Setup Complete!",
                &format!(
                    "Your configuration and login token have been saved to '{}'.\n\n\
                     To play, add the Windows build of Slipstream to Steam or Lutris and run it using Proton or Wine. \
                     It will use the settings file you just created.",
                    store.path().display()
                ),
            )
            .await;
    }

    let companion = async {
        if outcome != LaunchOutcome::Started {
            return;
        }
        if let Err(e) = launcher.launch_companion(&settings.companion).await {
            warn!("Error launching BakkesMod: {}", e);
            dialogs
                .show_error(
                    "BakkesMod Launch Failed",
                    &format!("{e}\n\nRocket League should still be running."),
                )
                .await;
        }
    };
    let update = check_for_updates(&dialogs, settings.last_notified_version.clone());
    let (_, notified) = tokio::join!(companion, update);

    // Only this task writes the settings file.
    if let Some(version) = notified {
        settings.last_notified_version = Some(version);
        if let Err(e) = store.save(&settings).await {
            warn!("Failed to save last notified version: {}", e);
        }
    }

    Ok(())
}

/// Save `token` unless it is what the settings already hold
async fn persist_token(store: &SettingsStore, settings: &mut Settings, token: &str) {
    if token.is_empty() || token == settings.epic_token {
        return;
    }

    info!("Saving new session token");
    settings.epic_token = token.to_string();
    if let Err(e) = store.save(settings).await {
        warn!("Could not save new session token: {}", e);
    }
}

/// Returns the version the user was just told about
async fn check_for_updates(dialogs: &TerminalDialogs, last_notified: Option<String>) -> Option<String> {
    let checker = match UpdateChecker::new(CURRENT_VERSION, LATEST_RELEASE_URL) {
        Ok(checker) => checker,
        Err(e) => {
            warn!("Update check failed: {}", e);
            return None;
        }
    };

    let latest = match checker.check(last_notified.as_deref()).await {
        Ok(latest) => latest?,
        Err(e) => {
            warn!("Update check failed: {}", e);
            return None;
        }
    };

    dialogs
        .show_info(
            "Update Available",
            &format!(
                "A new version of Slipstream is available!\n\n\
                 You are on version: {}\n\
                 The latest version is: {}\n\n\
                 You can download the new version from the releases page.",
                checker.current_version(),
                latest
            ),
        )
        .await;

    if dialogs.confirm("Open download page?", false).await {
        match Url::parse(RELEASES_PAGE_URL) {
            Ok(url) => {
                if let Err(e) = SystemBrowser.open(&url) {
                    warn!("Failed to open browser: {}", e);
                }
            }
            Err(e) => warn!("Invalid releases page URL: {}", e),
        }
    }

    Some(latest)
}
