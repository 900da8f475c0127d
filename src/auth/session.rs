//! Session credentials held by the client

use serde::{Deserialize, Serialize};

/// Access and refresh tokens for the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The bearer access token
    pub token: Option<String>,

    /// The refresh token
    pub refresh_token: Option<String>,
}

impl AuthSession {
    /// Create a session holding both tokens
    pub fn new(token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// Both tokens, if the session holds a complete set of credentials
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.token, &self.refresh_token) {
            (Some(token), Some(refresh)) => Some((token.as_str(), refresh.as_str())),
            _ => None,
        }
    }
}
