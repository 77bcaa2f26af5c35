use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::{endpoints, AuthConfig};
use crate::errors::{Result, TransportError};
use crate::models::ApiResponse;

pub const CORRELATION_HEADER: &str = "X-Epic-Correlation-ID";

/// The three round trips between a stored credential and a launch code
#[async_trait::async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Trade a one-time authorization code for a refresh token
    async fn exchange_authorization_code(&self, code: &str) -> Result<ApiResponse>;

    /// Trade a refresh token for an `eg1` access token and a (possibly rotated) refresh token
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<ApiResponse>;

    /// Trade an access token for the single-use code the game logs in with
    async fn launch_exchange_code(&self, access_token: &str) -> Result<ApiResponse>;
}

/// HTTP client for the Epic Games account service
#[derive(Debug, Clone)]
pub struct EpicAccountClient {
    config: AuthConfig,
    http: Client,
}

impl EpicAccountClient {
    /// Create a new account service client
    pub fn new(config: AuthConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.http_timeouts.connect)
            .timeout(config.http_timeouts.request)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Fresh correlation id so each attempt is traceable on its own server-side
    fn correlation_id(&self) -> String {
        format!(
            "{}-{}",
            self.config.correlation_prefix,
            Uuid::new_v4().to_string().to_uppercase()
        )
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<ApiResponse> {
        let authorization = self.config.client_auth.clone();
        self.api_request(Method::POST, endpoints::TOKEN_PATH, Some(form), &authorization)
            .await
    }

    /// Send one request and decode the shared response shape.
    ///
    /// The service reports failures in the body, so the HTTP status is only logged;
    /// a non-empty `errorCode` is what turns into an error.
    async fn api_request(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
        authorization: &str,
    ) -> Result<ApiResponse> {
        let url = self.config.endpoint(path)?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, authorization)
            .header(CORRELATION_HEADER, self.correlation_id());
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%method, path, %status, "Account service responded");

        let decoded: ApiResponse = serde_json::from_slice(&body)?;
        decoded.into_result()
    }
}

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(TransportError::Incomplete(field).into());
    }
    Ok(())
}

#[async_trait::async_trait]
impl TokenExchanger for EpicAccountClient {
    #[instrument(skip(self, code))]
    async fn exchange_authorization_code(&self, code: &str) -> Result<ApiResponse> {
        debug!("Exchanging authorization code for refresh token");
        let resp = self
            .token_request(&[("grant_type", "authorization_code"), ("code", code)])
            .await?;

        require(&resp.refresh_token, "refresh_token")?;
        Ok(resp)
    }

    #[instrument(skip(self, refresh_token))]
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<ApiResponse> {
        debug!("Exchanging refresh token for access token");
        let resp = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("token_type", "eg1"),
            ])
            .await?;

        require(&resp.access_token, "access_token")?;
        require(&resp.refresh_token, "refresh_token")?;
        require(&resp.account_id, "account_id")?;
        Ok(resp)
    }

    #[instrument(skip(self, access_token))]
    async fn launch_exchange_code(&self, access_token: &str) -> Result<ApiResponse> {
        debug!("Requesting launch exchange code");
        let authorization = format!("bearer {}", access_token);
        let resp = self
            .api_request(Method::GET, endpoints::EXCHANGE_PATH, None, &authorization)
            .await?;

        require(&resp.code, "code")?;
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{launcher, HttpTimeouts};
    use crate::errors::{AuthError, ErrorKind};
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CORRELATION_PATTERN: &str =
        r"^UE4-[0-9A-F]{8}-[0-9A-F]{4}-4[0-9A-F]{3}-[0-9A-F]{4}-[0-9A-F]{12}$";

    fn client_for(server: &MockServer) -> EpicAccountClient {
        let config =
            AuthConfig::epic_launcher().with_api_base(Url::parse(&server.uri()).unwrap());
        EpicAccountClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_authorization_code_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header("authorization", launcher::CLIENT_AUTH))
            .and(header("user-agent", launcher::USER_AGENT))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(header_regex(CORRELATION_HEADER, CORRELATION_PATTERN))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=ABCDEFGHIJKLMNOPQRSTUVWXYZ012345"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-0",
                "refresh_token": "rt-1",
                "account_id": "acct-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .exchange_authorization_code("ABCDEFGHIJKLMNOPQRSTUVWXYZ012345")
            .await
            .unwrap();

        assert_eq!(resp.refresh_token, "rt-1");
    }

    #[tokio::test]
    async fn test_refresh_token_grant_requests_eg1() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt-1"))
            .and(body_string_contains("token_type=eg1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-1",
                "refresh_token": "rt-2",
                "account_id": "acct-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server).exchange_refresh_token("rt-1").await.unwrap();

        assert_eq!(resp.access_token, "at-1");
        assert_eq!(resp.refresh_token, "rt-2");
        assert_eq!(resp.account_id, "acct-1");
    }

    #[tokio::test]
    async fn test_exchange_code_uses_bearer_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/exchange"))
            .and(header("authorization", "bearer at-1"))
            .and(header_regex(CORRELATION_HEADER, CORRELATION_PATTERN))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "expiresInSeconds": 300,
                "code": "xc-1",
                "creatingClientId": "34a02cf8f4414e29b15921876da36f9a"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server).launch_exchange_code("at-1").await.unwrap();

        assert_eq!(resp.code, "xc-1");
    }

    #[tokio::test]
    async fn test_error_payload_is_api_error_regardless_of_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "errorCode": "errors.com.epicgames.account.auth_token.invalid_refresh_token",
                "errorMessage": "Sorry the refresh token 'rt-expired' is invalid"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange_refresh_token("rt-expired")
            .await
            .unwrap_err();

        match err {
            AuthError::Api { code, message } => {
                assert!(code.ends_with("invalid_refresh_token"));
                assert!(message.contains("is invalid"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/exchange"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .launch_exchange_code("at-1")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_is_incomplete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-0"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange_authorization_code("ABCDEFGHIJKLMNOPQRSTUVWXYZ012345")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Transport(TransportError::Incomplete("refresh_token"))
        ));
    }

    #[tokio::test]
    async fn test_missing_account_id_is_incomplete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-1",
                "refresh_token": "rt-2"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .exchange_refresh_token("rt-1")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Transport(TransportError::Incomplete("account_id"))
        ));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_missing_exchange_code_is_incomplete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/exchange"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "expiresInSeconds": 300
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .launch_exchange_code("at-1")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Transport(TransportError::Incomplete("code"))
        ));
    }

    #[tokio::test]
    async fn test_slow_response_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "access_token": "at-1",
                        "refresh_token": "rt-2",
                        "account_id": "acct-1"
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config =
            AuthConfig::epic_launcher().with_api_base(Url::parse(&server.uri()).unwrap());
        config.http_timeouts = HttpTimeouts {
            connect: Duration::from_millis(300),
            request: Duration::from_millis(300),
        };
        let client = EpicAccountClient::new(config).unwrap();

        let err = client.exchange_refresh_token("rt-1").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        match err {
            AuthError::Transport(TransportError::Network(e)) => assert!(e.is_timeout()),
            other => panic!("expected a network timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let err = client.exchange_refresh_token("rt-1").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_correlation_ids_are_unique() {
        let client = EpicAccountClient::new(AuthConfig::epic_launcher()).unwrap();
        let first = client.correlation_id();
        let second = client.correlation_id();

        assert_ne!(first, second);
        assert!(first.starts_with("UE4-"));
        assert_eq!(first, first.to_uppercase());
    }
}
