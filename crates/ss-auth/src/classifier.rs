use crate::config::AUTHORIZATION_CODE_LEN;

/// A stored credential, tagged by what it can be exchanged for.
///
/// The account service uses the same opaque shape for authorization codes and refresh
/// tokens; the only local discriminator is the fixed length of authorization codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedToken {
    Empty,
    AuthorizationCode(String),
    RefreshToken(String),
}

impl ClassifiedToken {
    /// Classify a stored token. Surrounding whitespace is ignored.
    ///
    /// Length is measured in bytes; real codes are ASCII so bytes and characters agree.
    pub fn classify(stored: &str) -> Self {
        let token = stored.trim();
        match token.len() {
            0 => Self::Empty,
            AUTHORIZATION_CODE_LEN => Self::AuthorizationCode(token.to_string()),
            _ => Self::RefreshToken(token.to_string()),
        }
    }
}
