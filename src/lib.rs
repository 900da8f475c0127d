//! EventHub Rust Client Library
//!
//! A Rust client for the EventHub API: events, event sessions and
//! registrations, with bearer token handling and client-side session
//! scheduling checks.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod scheduling;
pub mod store;

use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::auth::{Auth, AuthGuard};
use crate::client::ApiClient;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::events::EventsClient;
use crate::store::ClientState;

/// The main entry point for the EventHub client
pub struct EventHub {
    /// The base URL for the API
    pub url: String,
    /// Auth client for login, refresh and logout
    auth: Arc<Auth>,
    /// Shared request path for the resource clients
    api: Arc<ApiClient>,
    /// Session, user and filter state
    state: Arc<ClientState>,
}

impl EventHub {
    /// Create a new EventHub client
    ///
    /// # Example
    ///
    /// ```
    /// use eventhub_client::EventHub;
    ///
    /// let hub = EventHub::new("https://api.eventhub.example").unwrap();
    /// ```
    pub fn new(url: &str) -> Result<Self, Error> {
        Self::new_with_options(url, ClientOptions::default())
    }

    /// Create a new EventHub client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use eventhub_client::{EventHub, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_auto_refresh_token(false);
    /// let hub = EventHub::new_with_options("https://api.eventhub.example", options).unwrap();
    /// ```
    pub fn new_with_options(url: &str, options: ClientOptions) -> Result<Self, Error> {
        Self::with_state(url, options, Arc::new(ClientState::new()))
    }

    /// Create a client around an existing state container, e.g. one restored
    /// from stored credentials
    pub fn with_state(
        url: &str,
        options: ClientOptions,
        state: Arc<ClientState>,
    ) -> Result<Self, Error> {
        Url::parse(url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let auth = Arc::new(Auth::new(url, http_client.clone(), state.clone()));
        let api = Arc::new(ApiClient::new(
            url,
            http_client,
            state.clone(),
            auth.clone(),
            options,
        ));

        Ok(Self {
            url: url.to_string(),
            auth,
            api,
            state,
        })
    }

    /// Create a client from `EVENTHUB_API_URL` and the options in the environment
    pub fn from_env() -> Result<Self, Error> {
        let url = std::env::var("EVENTHUB_API_URL")
            .map_err(|_| Error::config("EVENTHUB_API_URL environment variable not found"))?;
        Self::new_with_options(&url, ClientOptions::from_env()?)
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get a reference to the token guard, e.g. for route protection
    pub fn guard(&self) -> &AuthGuard<Arc<Auth>> {
        self.api.guard()
    }

    /// Get a client for events, sessions and registrations
    pub fn events(&self) -> EventsClient {
        EventsClient::new(self.api.clone())
    }

    /// Get the shared client state
    pub fn state(&self) -> &Arc<ClientState> {
        &self.state
    }

    /// Get the client options
    pub fn options(&self) -> &ClientOptions {
        self.api.options()
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, SchedulingRules};
    pub use crate::error::{ApiError, ApiErrorKind, Error};
    pub use crate::scheduling::{format_duration, validate, TimeWindow, ValidationResult};
    pub use crate::EventHub;
}
