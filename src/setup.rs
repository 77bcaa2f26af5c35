use anyhow::Context;
use ss_auth::Dialogs;
use ss_settings::{Settings, SettingsStore};
use tracing::{info, instrument, warn};

use crate::dialogs::TerminalDialogs;

/// Load settings and ask for whatever is still missing.
///
/// Each answer is saved right away so a later failure doesn't make the user repeat it.
#[instrument(skip_all)]
pub async fn load_settings(store: &SettingsStore, dialogs: &TerminalDialogs) -> anyhow::Result<Settings> {
    let mut settings = store.load().await?;

    if settings.game_path.is_none() {
        dialogs
            .show_info(
                "Rocket League Path Setup",
                "Please locate your Rocket League executable (e.g., RocketLeague.exe). This will only be asked once.",
            )
            .await;
        let path = dialogs
            .prompt_path("Path to RocketLeague.exe")
            .await
            .context("You must select a Rocket League path to continue")?;
        settings.game_path = Some(path);

        if let Err(e) = store.save(&settings).await {
            warn!("Could not save Rocket League path: {}", e);
        }
    }

    if settings.needs_companion_setup() {
        info!("Prompting for BakkesMod setup");
        if dialogs
            .confirm("Would you like to enable automatic launching for BakkesMod?", false)
            .await
        {
            match dialogs.prompt_path("Path to BakkesMod.exe").await {
                Some(path) => {
                    info!("BakkesMod path selected: {}", path.display());
                    settings.enable_companion(path);
                }
                // Not a permanent no; ask again next run.
                None => info!("User did not select a BakkesMod path"),
            }
        } else {
            info!("User declined BakkesMod setup");
            settings.decline_companion();
        }

        store
            .save(&settings)
            .await
            .context("Could not save BakkesMod configuration")?;
    }

    if settings.normalize() {
        info!("BakkesMod enabled without a launch delay, using the default");
        if let Err(e) = store.save(&settings).await {
            warn!("Could not save default BakkesMod launch delay: {}", e);
        }
    }

    Ok(settings)
}
