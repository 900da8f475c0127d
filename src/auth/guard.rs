//! Token guard used before authenticated requests and protected routes

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use super::token::is_token_expired;
use crate::error::Error;
use crate::store::ClientState;

/// Something that can renew the session's access token.
///
/// Implementations update the shared [`ClientState`] themselves and report
/// whether a usable token is now held.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<bool, Error>;
}

#[async_trait]
impl<T: TokenRefresher + ?Sized> TokenRefresher for Arc<T> {
    async fn refresh(&self) -> Result<bool, Error> {
        (**self).refresh().await
    }
}

/// Decides whether the held token is usable and renews it when it is not
pub struct AuthGuard<R> {
    state: Arc<ClientState>,
    refresher: R,
    // Serialises refreshes so concurrent callers share one attempt
    refresh_lock: Mutex<()>,
    // Number of finished refresh attempts and the result of the latest one
    completed: AtomicU64,
    last_outcome: AtomicBool,
}

impl<R: TokenRefresher> AuthGuard<R> {
    pub fn new(state: Arc<ClientState>, refresher: R) -> Self {
        Self {
            state,
            refresher,
            refresh_lock: Mutex::new(()),
            completed: AtomicU64::new(0),
            last_outcome: AtomicBool::new(false),
        }
    }

    /// Whether the caller holds a usable token, refreshing it if it expired.
    ///
    /// Returns `false` without contacting the server when either token is
    /// missing. A token that cannot be decoded is treated as expired. Refresh
    /// failures are reported as `false` and never retried.
    pub async fn check_and_refresh(&self) -> bool {
        let session = self.state.session();
        let Some((token, _)) = session.credentials() else {
            debug!("No credentials held");
            return false;
        };

        if !is_token_expired(token) {
            return true;
        }

        debug!("Access token expired, refreshing");
        self.refresh_replacing(token).await
    }

    /// Refresh regardless of the token's expiry claim.
    ///
    /// Used when the server rejects a token the client still considers valid.
    pub async fn force_refresh(&self) -> bool {
        let session = self.state.session();
        let Some((token, _)) = session.credentials() else {
            return false;
        };

        self.refresh_replacing(token).await
    }

    /// The `Authorization` header for the held token, if any
    pub fn auth_header(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(token) = self.state.access_token() {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    async fn refresh_replacing(&self, stale: &str) -> bool {
        let seen = self.completed.load(Ordering::SeqCst);
        let _in_flight = self.refresh_lock.lock().await;

        // Another caller may have finished a refresh while this one waited.
        let current = self.state.session();
        match current.credentials() {
            None => {
                debug!("Credentials cleared by a concurrent refresh");
                return false;
            }
            Some((token, _)) if token != stale && !is_token_expired(token) => {
                debug!("Token already refreshed by a concurrent caller");
                return true;
            }
            Some(_) => {}
        }

        if self.completed.load(Ordering::SeqCst) != seen {
            let outcome = self.last_outcome.load(Ordering::SeqCst);
            debug!("Sharing the outcome of a concurrent refresh: {}", outcome);
            return outcome;
        }

        let outcome = match self.refresher.refresh().await {
            Ok(true) => {
                info!("Access token refreshed");
                true
            }
            Ok(false) => {
                warn!("Token refresh was rejected");
                false
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                false
            }
        };

        self.last_outcome.store(outcome, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}
