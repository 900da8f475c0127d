//! Types for authentication

use serde::{Deserialize, Serialize};

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: String,

    /// The user's email address
    pub email: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// The user's role, e.g. `organizer` or `attendee`
    #[serde(default)]
    pub role: Option<String>,
}

/// Credentials sent to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Response from the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The access token
    pub token: String,

    /// The refresh token
    #[serde(rename = "refresh_token")]
    pub refresh_token: String,

    /// The signed-in user
    pub user: User,
}

/// Response from the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// The new access token
    pub token: String,

    /// The rotated refresh token, when the server rotates it
    #[serde(rename = "refresh_token", default)]
    pub refresh_token: Option<String>,
}
