use url::Url;

use crate::errors::Result;

/// User-facing notifications and prompts
///
/// Implemented by the host application; the authorizer only ever talks to the user
/// through this trait.
#[async_trait::async_trait]
pub trait Dialogs: Send + Sync {
    async fn show_info(&self, title: &str, message: &str);

    async fn show_error(&self, title: &str, message: &str);

    /// Ask for a single line of text.
    ///
    /// Returns [`AuthError::Cancelled`](crate::AuthError::Cancelled) if the user dismisses
    /// the prompt.
    async fn prompt_text(&self, title: &str, message: &str) -> Result<String>;
}

/// Opens a URL in the user's default browser
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &Url) -> std::io::Result<()>;
}
