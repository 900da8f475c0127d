//! Types for session scheduling

use serde::{Deserialize, Serialize};

/// A proposed session window, as entered in a session form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_time: String,
    pub end_time: String,
}

impl TimeWindow {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// The parent event's window; sessions must fit inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub event_start_date: String,
    pub event_end_date: String,
}

impl EventWindow {
    pub fn new(event_start_date: impl Into<String>, event_end_date: impl Into<String>) -> Self {
        Self {
            event_start_date: event_start_date.into(),
            event_end_date: event_end_date.into(),
        }
    }
}

/// A session already scheduled for the same event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingSession {
    pub id: String,
    /// Display name used in conflict messages
    pub title: String,
    pub start_time: String,
    pub end_time: String,
}

impl ExistingSession {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// Outcome of validating a session window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Build a result; validity follows from the absence of errors
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
