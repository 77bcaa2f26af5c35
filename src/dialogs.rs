use std::path::PathBuf;

use dialoguer::{Confirm, Input};
use ss_auth::{AuthError, BrowserLauncher, Dialogs};
use tracing::{error, info, warn};
use url::Url;

use crate::telemetry::DIALOG_TARGET;

/// Dialogs rendered on the terminal the launcher was started from
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDialogs;

impl TerminalDialogs {
    /// Yes/no question; any prompt failure counts as the default answer
    pub async fn confirm(&self, question: &str, default: bool) -> bool {
        let question = question.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new()
                .with_prompt(question)
                .default(default)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                warn!("Confirmation prompt failed: {}", e);
                default
            }
            Err(e) => {
                warn!("Confirmation prompt task failed: {}", e);
                default
            }
        }
    }

    /// Ask for a file path. `None` when the user enters nothing.
    pub async fn prompt_path(&self, prompt: &str) -> Option<PathBuf> {
        let line = read_line(prompt.to_string()).await?;
        let path = line.trim().trim_matches('"');
        if path.is_empty() {
            return None;
        }
        Some(PathBuf::from(path))
    }
}

async fn read_line(prompt: String) -> Option<String> {
    let input = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await;

    match input {
        Ok(Ok(line)) => Some(line),
        Ok(Err(e)) => {
            warn!("Text prompt failed: {}", e);
            None
        }
        Err(e) => {
            warn!("Text prompt task failed: {}", e);
            None
        }
    }
}

#[async_trait::async_trait]
impl Dialogs for TerminalDialogs {
    async fn show_info(&self, title: &str, message: &str) {
        info!(target: DIALOG_TARGET, "INFO: {} - {}", title, message);
        println!("\n== {} ==\n{}\n", title, message);
    }

    async fn show_error(&self, title: &str, message: &str) {
        error!(target: DIALOG_TARGET, "ERROR: {} - {}", title, message);
        eprintln!("\n!! {} !!\n{}\n", title, message);
    }

    async fn prompt_text(&self, title: &str, message: &str) -> ss_auth::Result<String> {
        info!(target: DIALOG_TARGET, "PROMPT: {}", title);
        println!("{}", message);
        match read_line(title.to_string()).await {
            Some(line) if !line.trim().is_empty() => Ok(line),
            _ => Err(AuthError::Cancelled),
        }
    }
}

/// Opens URLs with the OS default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &Url) -> std::io::Result<()> {
        open::that_detached(url.as_str())
    }
}
