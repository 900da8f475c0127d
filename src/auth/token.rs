//! Bearer token claim decoding

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Error;

/// Claims carried in the payload segment of a bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry as seconds since the Unix epoch
    pub expiry: f64,
}

impl TokenClaims {
    /// Decode the claims from a `header.payload.signature` token.
    ///
    /// The signature is not verified; the claims are only used to decide
    /// whether the token is worth sending.
    pub fn decode(token: &str) -> Result<Self, Error> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(Error::auth(format!(
                "expected 3 token segments, found {}",
                segments.len()
            )));
        }

        let payload = segments[1].trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .map_err(|e| Error::auth(format!("invalid token payload: {}", e)))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Whether the claims have expired as of `now_secs`
    pub fn is_expired_at(&self, now_secs: f64) -> bool {
        self.expiry <= now_secs
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs_f64()
}

/// Whether `token` should be treated as expired.
///
/// Tokens that cannot be decoded count as expired.
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, now_secs())
}

/// Same as [`is_token_expired`] against an explicit clock
pub fn is_token_expired_at(token: &str, now_secs: f64) -> bool {
    match TokenClaims::decode(token) {
        Ok(claims) => claims.is_expired_at(now_secs),
        Err(_) => true,
    }
}
