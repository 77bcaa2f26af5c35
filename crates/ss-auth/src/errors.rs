use thiserror::Error;

/// Epic account authentication error types
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid authorization code: must be 32 characters long, got {length}")]
    InvalidCodeFormat { length: usize },

    #[error("User cancelled the authorization prompt")]
    Cancelled,

    #[error("Request to the account service failed: {0}")]
    Transport(#[from] TransportError),

    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Refresh token exchange failed ({original}) and re-authorization also failed ({recovery})")]
    RecoveryFailed {
        original: Box<AuthError>,
        recovery: Box<AuthError>,
    },
}

/// Failures below the API level: the request never produced a usable payload
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Response is missing {0}")]
    Incomplete(&'static str),
}

/// Coarse classification of [`AuthError`] for callers that branch on failure type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCodeFormat,
    Cancelled,
    Transport,
    Api,
    RecoveryFailed,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCodeFormat { .. } => ErrorKind::InvalidCodeFormat,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Api { .. } => ErrorKind::Api,
            Self::RecoveryFailed { .. } => ErrorKind::RecoveryFailed,
        }
    }

    /// Whether the refresh-token exchange may be retried after re-authorizing
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Api | ErrorKind::Transport)
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.into())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(err.into())
    }
}

impl From<url::ParseError> for AuthError {
    fn from(err: url::ParseError) -> Self {
        Self::Transport(err.into())
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
