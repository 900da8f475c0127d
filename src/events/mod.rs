//! Events, sessions and registrations

mod types;

use std::sync::Arc;

use log::{info, warn};

use crate::client::ApiClient;
use crate::error::Error;
use crate::scheduling::{ExistingSession, SessionValidator, ValidationResult};

pub use types::*;

/// Client for the event endpoints
pub struct EventsClient {
    api: Arc<ApiClient>,
}

impl EventsClient {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// List events matching the filter
    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, Error> {
        self.api.get("/events", filter.to_query()).await
    }

    /// Get a single event
    pub async fn get_event(&self, event_id: &str) -> Result<Event, Error> {
        self.api
            .get(&format!("/events/{}", event_id), Vec::new())
            .await
    }

    /// List the sessions scheduled for an event
    pub async fn list_sessions(&self, event_id: &str) -> Result<Vec<EventSession>, Error> {
        self.api
            .get(&format!("/events/{}/sessions", event_id), Vec::new())
            .await
    }

    /// Check a session against the event's window and its current sessions
    /// without submitting it.
    ///
    /// When `editing` names a session, that session is left out of the
    /// conflict checks.
    pub async fn check_session(
        &self,
        event: &Event,
        session: &NewSession,
        editing: Option<&str>,
    ) -> Result<ValidationResult, Error> {
        let existing: Vec<ExistingSession> = self
            .list_sessions(&event.id)
            .await?
            .iter()
            .map(ExistingSession::from)
            .collect();

        let mut validator = SessionValidator::new(self.api.options().scheduling.clone());
        if let Some(id) = editing {
            validator = validator.excluding(id);
        }

        Ok(validator.validate(&session.window(), &existing, Some(&event.window())))
    }

    async fn ensure_valid(
        &self,
        event: &Event,
        session: &NewSession,
        editing: Option<&str>,
    ) -> Result<(), Error> {
        let result = self.check_session(event, session, editing).await?;
        if !result.is_valid {
            return Err(Error::Validation(result));
        }
        if result.has_warnings() {
            warn!(
                "Session '{}' is close to other sessions: {}",
                session.title,
                result.warnings.join("; ")
            );
        }
        Ok(())
    }

    /// Create a session after validating its window
    pub async fn create_session(
        &self,
        event: &Event,
        session: &NewSession,
    ) -> Result<EventSession, Error> {
        self.ensure_valid(event, session, None).await?;

        let created: EventSession = self
            .api
            .post(&format!("/events/{}/sessions", event.id), session)
            .await?;

        info!("Created session {} in event {}", created.id, event.id);
        Ok(created)
    }

    /// Update a session after validating its new window
    pub async fn update_session(
        &self,
        event: &Event,
        session_id: &str,
        session: &NewSession,
    ) -> Result<EventSession, Error> {
        self.ensure_valid(event, session, Some(session_id)).await?;

        self.api
            .put(
                &format!("/events/{}/sessions/{}", event.id, session_id),
                session,
            )
            .await
    }

    /// Register the signed-in user for an event
    pub async fn register(&self, event_id: &str) -> Result<Registration, Error> {
        let registration: Registration = self
            .api
            .post(
                &format!("/events/{}/registrations", event_id),
                &serde_json::json!({}),
            )
            .await?;

        info!(
            "Registered for event {} ({:?})",
            event_id, registration.status
        );
        Ok(registration)
    }

    /// Cancel a registration
    pub async fn cancel_registration(
        &self,
        event_id: &str,
        registration_id: &str,
    ) -> Result<(), Error> {
        self.api
            .delete(&format!(
                "/events/{}/registrations/{}",
                event_id, registration_id
            ))
            .await
    }

    /// The signed-in user's registrations
    pub async fn my_registrations(&self) -> Result<Vec<Registration>, Error> {
        self.api.get("/registrations/me", Vec::new()).await
    }
}
