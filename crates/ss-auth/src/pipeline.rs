use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::authorizer::Authorizer;
use crate::classifier::ClassifiedToken;
use crate::client::TokenExchanger;
use crate::errors::{AuthError, Result};
use crate::models::{ApiResponse, LaunchCredentials};

/// Successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub credentials: LaunchCredentials,
    /// Latest refresh token; store it if it differs from what was passed in
    pub token_to_persist: String,
}

/// Failed pipeline run.
///
/// `token_to_persist` is set when a valid refresh token was obtained before the failure,
/// so the next run can skip interactive authorization.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PipelineError {
    #[source]
    pub error: AuthError,
    pub token_to_persist: Option<String>,
}

impl PipelineError {
    fn new(error: AuthError) -> Self {
        Self {
            error,
            token_to_persist: None,
        }
    }
}

/// Turns whatever token the settings file holds into launch credentials
pub struct CredentialPipeline {
    exchanger: Arc<dyn TokenExchanger>,
    authorizer: Arc<dyn Authorizer>,
}

impl CredentialPipeline {
    pub fn new(exchanger: Arc<dyn TokenExchanger>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            exchanger,
            authorizer,
        }
    }

    /// Run the whole credential flow once.
    ///
    /// A rejected refresh token triggers exactly one interactive re-authorization; if that
    /// fails too the run ends with [`AuthError::RecoveryFailed`].
    #[instrument(skip_all)]
    pub async fn get_launch_credentials(
        &self,
        stored_token: &str,
    ) -> std::result::Result<Acquired, PipelineError> {
        let refresh_token = match ClassifiedToken::classify(stored_token) {
            ClassifiedToken::Empty => {
                info!("No token found, performing first-time authorization");
                let code = self.authorizer.authorization_code().await.map_err(PipelineError::new)?;
                self.redeem_code(&code).await.map_err(PipelineError::new)?
            }
            ClassifiedToken::AuthorizationCode(code) => {
                info!("Stored token is an authorization code, redeeming it");
                self.redeem_code(&code).await.map_err(PipelineError::new)?
            }
            ClassifiedToken::RefreshToken(token) => token,
        };

        info!("Acquiring access token using refresh token");
        let session = match self.exchanger.exchange_refresh_token(&refresh_token).await {
            Ok(session) => session,
            Err(original) if original.is_recoverable() => {
                warn!("Refresh token rejected ({}), re-authorizing", original);
                self.recover().await.map_err(|recovery| {
                    PipelineError::new(AuthError::RecoveryFailed {
                        original: Box::new(original),
                        recovery: Box::new(recovery),
                    })
                })?
            }
            Err(e) => return Err(PipelineError::new(e)),
        };

        // The service may rotate the refresh token on every use.
        let token_to_persist = session.refresh_token;

        info!("Acquiring game launch exchange code");
        let exchange = self
            .exchanger
            .launch_exchange_code(&session.access_token)
            .await
            .map_err(|error| PipelineError {
                error,
                token_to_persist: Some(token_to_persist.clone()),
            })?;

        Ok(Acquired {
            credentials: LaunchCredentials {
                exchange_code: exchange.code,
                account_id: session.account_id,
            },
            token_to_persist,
        })
    }

    async fn redeem_code(&self, code: &str) -> Result<String> {
        let resp = self.exchanger.exchange_authorization_code(code).await?;
        Ok(resp.refresh_token)
    }

    /// One-shot fallback: fresh code, fresh refresh token, one more refresh exchange
    async fn recover(&self) -> Result<ApiResponse> {
        let code = self.authorizer.authorization_code().await?;
        let refresh_token = self.redeem_code(&code).await?;
        info!("Obtained a new refresh token, retrying access token exchange");
        self.exchanger.exchange_refresh_token(&refresh_token).await
    }
}
