use std::sync::Arc;

use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::AUTHORIZATION_CODE_LEN;
use crate::errors::{AuthError, Result};
use crate::ui::{BrowserLauncher, Dialogs};

pub const AUTHORIZATION_REQUIRED_TITLE: &str = "Authorization Required";
pub const AUTHORIZATION_REQUIRED_MESSAGE: &str = "A browser window will now open. Please log in to your Epic Games account, then copy the 'authorizationCode' value from the page you are redirected to.";
pub const CODE_PROMPT_TITLE: &str = "Enter Authorization Code";
pub const CODE_PROMPT_MESSAGE: &str = "Paste the 32-character authorization code here:";

/// Source of fresh authorization codes
#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorization_code(&self) -> Result<String>;
}

/// Obtains an authorization code by sending the user through the Epic login page
pub struct InteractiveAuthorizer {
    login_url: Url,
    dialogs: Arc<dyn Dialogs>,
    browser: Arc<dyn BrowserLauncher>,
}

impl InteractiveAuthorizer {
    pub fn new(login_url: Url, dialogs: Arc<dyn Dialogs>, browser: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            login_url,
            dialogs,
            browser,
        }
    }
}

#[async_trait::async_trait]
impl Authorizer for InteractiveAuthorizer {
    #[instrument(skip(self))]
    async fn authorization_code(&self) -> Result<String> {
        self.dialogs
            .show_info(AUTHORIZATION_REQUIRED_TITLE, AUTHORIZATION_REQUIRED_MESSAGE)
            .await;

        // The user can still navigate there by hand.
        if let Err(e) = self.browser.open(&self.login_url) {
            warn!("Failed to open browser: {}", e);
        }

        let input = self
            .dialogs
            .prompt_text(CODE_PROMPT_TITLE, CODE_PROMPT_MESSAGE)
            .await?;
        let code = input.trim();

        let length = code.len();
        if length != AUTHORIZATION_CODE_LEN {
            return Err(AuthError::InvalidCodeFormat { length });
        }

        debug!("Received authorization code");
        Ok(code.to_string())
    }
}
