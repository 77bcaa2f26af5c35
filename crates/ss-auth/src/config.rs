use std::time::Duration;
use url::Url;

/// Epic Games account service endpoints
pub mod endpoints {
    pub const ACCOUNT_API: &str = "https://account-public-service-prod.ak.epicgames.com/account/api";
    pub const TOKEN_PATH: &str = "oauth/token";
    pub const EXCHANGE_PATH: &str = "oauth/exchange";

    /// Forces a fresh login prompt even if the browser already holds an Epic session.
    pub const LOGIN_REDIRECT: &str = "https://www.epicgames.com/id/login?redirectUrl=https%3A//www.epicgames.com/id/api/redirect%3FclientId%3D34a02cf8f4414e29b15921876da36f9a%26responseType%3Dcode";
}

/// Identity of the official Epic Games launcher
pub mod launcher {
    /// `client_id:client_secret` of the launcher, base64 encoded
    pub const CLIENT_AUTH: &str = "basic MzRhMDJjZjhmNDQxNGUyOWIxNTkyMTg3NmRhMzZmOWE6ZGFhZmJjY2M3Mzc3NDUwMzlkZmZlNTNkOTRmYzc2Y2Y=";
    pub const USER_AGENT: &str = "UELauncher/16.12.1-36115220+++Portal+Release-Live";
    pub const CORRELATION_PREFIX: &str = "UE4";
}

/// Authorization codes issued by the login redirect are always this long.
pub const AUTHORIZATION_CODE_LEN: usize = 32;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// Configuration for [`EpicAccountClient`](crate::EpicAccountClient) and the interactive login
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base of the account API; endpoint paths are joined onto it
    pub api_base: Url,

    /// Value of the `Authorization` header on token grants
    pub client_auth: String,

    /// Page opened in the browser to obtain an authorization code
    pub login_url: Url,

    pub user_agent: String,

    /// Prefix of the per-request `X-Epic-Correlation-ID`
    pub correlation_prefix: String,

    /// HTTP client timeouts
    pub http_timeouts: HttpTimeouts,
}

impl AuthConfig {
    /// Config impersonating the official Epic Games launcher
    pub fn epic_launcher() -> Self {
        Self {
            api_base: Url::parse(endpoints::ACCOUNT_API).expect("valid account API URL"),
            client_auth: launcher::CLIENT_AUTH.to_string(),
            login_url: Url::parse(endpoints::LOGIN_REDIRECT).expect("valid login URL"),
            user_agent: launcher::USER_AGENT.to_string(),
            correlation_prefix: launcher::CORRELATION_PREFIX.to_string(),
            http_timeouts: HttpTimeouts::default(),
        }
    }

    /// Same identity, different API base. Used to point the client at a mock server.
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// Resolve an endpoint path against `api_base`, keeping the base's own path segments.
    pub(crate) fn endpoint(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        let mut base = self.api_base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::epic_launcher()
    }
}
