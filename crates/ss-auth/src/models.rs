use serde::Deserialize;

use crate::errors::{AuthError, Result};

/// Payload shared by the token and exchange endpoints.
///
/// Every field is optional on the wire: grants fill the token fields, the exchange
/// endpoint fills `code`, and failures fill `errorCode`/`errorMessage` instead.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub account_id: String,
    pub code: String,
    #[serde(rename = "errorCode")]
    pub error_code: String,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl ApiResponse {
    /// Turn an in-band error payload into [`AuthError::Api`]
    pub fn into_result(self) -> Result<Self> {
        if self.error_code.is_empty() {
            return Ok(self);
        }
        Err(AuthError::Api {
            code: self.error_code,
            message: self.error_message,
        })
    }
}

/// What the game process needs to log in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCredentials {
    /// Single-use code passed as `-AUTH_PASSWORD`
    pub exchange_code: String,
    pub account_id: String,
}
