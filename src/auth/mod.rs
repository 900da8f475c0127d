//! Authentication for the EventHub API

mod guard;
mod session;
mod token;
mod types;

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::store::ClientState;

pub use guard::*;
pub use session::*;
pub use token::*;
pub use types::*;

/// Client for the EventHub authentication endpoints
pub struct Auth {
    /// The base URL for the API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Shared client state holding the session
    state: Arc<ClientState>,
}

impl Auth {
    /// Create a new Auth client
    pub fn new(url: &str, client: Client, state: Arc<ClientState>) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            state,
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/auth{}", self.url, path)
    }

    /// Sign in with email and password, storing the session on success
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        let url = self.get_auth_url("/login");

        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let result = Fetch::post(&self.client, &url)
            .json(&credentials)?
            .execute::<AuthResponse>()
            .await?;

        info!("Signed in as {}", result.user.email);
        self.state.login(
            result.token.clone(),
            result.refresh_token.clone(),
            result.user.clone(),
        );

        Ok(result)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Any failure clears the session: the caller has to sign in again.
    pub async fn refresh_session(&self) -> Result<AuthSession, Error> {
        let refresh_token = self
            .state
            .refresh_token()
            .ok_or_else(|| Error::auth("No refresh token"))?;

        let url = self.get_auth_url("/refresh");
        let body = serde_json::json!({ "refresh_token": refresh_token });

        let result = match Fetch::post(&self.client, &url)
            .json(&body)?
            .execute::<RefreshResponse>()
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!("Refresh failed, clearing session: {}", e);
                self.state.logout();
                return Err(e);
            }
        };

        self.state.set_tokens(result.token, result.refresh_token);
        Ok(self.state.session())
    }

    /// Sign out, clearing the local session even if the server call fails
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.get_auth_url("/logout");

        let result = match self.state.access_token() {
            Some(token) => {
                Fetch::post(&self.client, &url)
                    .bearer_auth(&token)
                    .execute_empty()
                    .await
            }
            None => Ok(()),
        };

        self.state.logout();
        info!("Signed out");

        result
    }

    /// Fetch the signed-in user and store it
    pub async fn current_user(&self) -> Result<User, Error> {
        let token = self
            .state
            .access_token()
            .ok_or_else(|| Error::auth("Not logged in"))?;

        let user = Fetch::get(&self.client, &self.get_auth_url("/me"))
            .bearer_auth(&token)
            .execute::<User>()
            .await?;

        self.state.set_user(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TokenRefresher for Auth {
    async fn refresh(&self) -> Result<bool, Error> {
        if self.state.refresh_token().is_none() {
            return Ok(false);
        }
        self.refresh_session().await?;
        Ok(true)
    }
}
