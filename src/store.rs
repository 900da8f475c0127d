//! Client-side state shared between the auth, guard and events clients

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::auth::{AuthSession, User};
use crate::events::EventFilter;

/// State container for the current session, user and event list filter.
///
/// Constructed explicitly and shared by `Arc` with every component that
/// needs it.
#[derive(Debug, Default)]
pub struct ClientState {
    session: RwLock<AuthSession>,
    user: RwLock<Option<User>>,
    filter: RwLock<EventFilter>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously stored credentials
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            session: RwLock::new(session),
            ..Self::default()
        }
    }

    /// A copy of the current credentials
    pub fn session(&self) -> AuthSession {
        read(&self.session).clone()
    }

    pub fn access_token(&self) -> Option<String> {
        read(&self.session).token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        read(&self.session).refresh_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        read(&self.user).clone()
    }

    /// Whether a complete set of credentials is held; says nothing about expiry
    pub fn is_authenticated(&self) -> bool {
        read(&self.session).credentials().is_some()
    }

    pub fn filter(&self) -> EventFilter {
        read(&self.filter).clone()
    }

    /// Record a successful login
    pub fn login(&self, token: String, refresh_token: String, user: User) {
        debug!("Storing session for user {}", user.id);
        *write(&self.session) = AuthSession {
            token: Some(token),
            refresh_token: Some(refresh_token),
        };
        *write(&self.user) = Some(user);
    }

    /// Replace the access token, and the refresh token when one was issued
    pub fn set_tokens(&self, token: String, refresh_token: Option<String>) {
        let mut session = write(&self.session);
        session.token = Some(token);
        if refresh_token.is_some() {
            session.refresh_token = refresh_token;
        }
    }

    pub fn set_user(&self, user: User) {
        *write(&self.user) = Some(user);
    }

    /// Drop the credentials and the current user
    pub fn logout(&self) {
        debug!("Clearing session");
        *write(&self.session) = AuthSession::default();
        *write(&self.user) = None;
    }

    pub fn set_filter(&self, filter: EventFilter) {
        *write(&self.filter) = filter;
    }

    pub fn clear_filter(&self) {
        *write(&self.filter) = EventFilter::default();
    }
}
