//! Types for events, sessions and registrations

use serde::{Deserialize, Serialize};

use crate::scheduling::{EventWindow, ExistingSession, TimeWindow};

/// An event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    /// Maximum number of confirmed registrations
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl Event {
    /// The window sessions of this event must fit in
    pub fn window(&self) -> EventWindow {
        EventWindow::new(self.start_date.clone(), self.end_date.clone())
    }
}

/// A scheduled session within an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSession {
    pub id: String,
    #[serde(default)]
    pub event_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

impl From<&EventSession> for ExistingSession {
    fn from(session: &EventSession) -> Self {
        ExistingSession::new(
            session.id.clone(),
            session.title.clone(),
            session.start_time.clone(),
            session.end_time.clone(),
        )
    }
}

/// Body for creating or updating a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

impl NewSession {
    pub fn new(
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            speaker: None,
            description: None,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Set the speaker
    pub fn with_speaker(mut self, speaker: &str) -> Self {
        self.speaker = Some(speaker.to_string());
        self
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time.clone(), self.end_time.clone())
    }
}

/// Registration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Confirmed,
    Waitlisted,
    Cancelled,
}

/// A user's registration for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: RegistrationStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Filter applied to the event list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Free-text search over title and description
    pub search: Option<String>,
    pub category: Option<String>,
    /// Only events starting on or after this date
    pub from_date: Option<String>,
    /// Only events starting on or before this date
    pub to_date: Option<String>,
}

impl EventFilter {
    /// Query parameters for the non-empty fields
    pub fn to_query(&self) -> Vec<(String, String)> {
        [
            ("search", &self.search),
            ("category", &self.category),
            ("from_date", &self.from_date),
            ("to_date", &self.to_date),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v.to_string()))
        })
        .collect()
    }
}
