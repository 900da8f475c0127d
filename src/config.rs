//! Configuration options for the EventHub client

use std::time::Duration;

use crate::error::Error;

/// Thresholds used by the session time conflict validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingRules {
    /// Shortest allowed session, in minutes
    pub min_duration_minutes: i64,

    /// Longest allowed session, in minutes
    pub max_duration_minutes: i64,

    /// Earliest hour of day a session may start at
    pub business_start_hour: u32,

    /// Latest hour of day a session may end at
    pub business_end_hour: u32,

    /// Start and end minutes must be multiples of this
    pub slot_minutes: u32,

    /// Margin around a session within which neighbours produce a warning
    pub buffer_minutes: i64,
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            min_duration_minutes: 15,
            max_duration_minutes: 480,
            business_start_hour: 8,
            business_end_hour: 22,
            slot_minutes: 30,
            buffer_minutes: 15,
        }
    }
}

/// Configuration options for the EventHub client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether to refresh an expired token before authenticated requests
    pub auto_refresh_token: bool,

    /// Whether a 401 response triggers one refresh and one retry
    pub retry_on_unauthorized: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Rules applied to session windows before they are submitted
    pub scheduling: SchedulingRules,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            retry_on_unauthorized: true,
            request_timeout: Some(Duration::from_secs(30)),
            scheduling: SchedulingRules::default(),
        }
    }
}

impl ClientOptions {
    /// Build options from the environment, falling back to the defaults.
    ///
    /// Reads `EVENTHUB_REQUEST_TIMEOUT_SECS` (0 disables the timeout) and
    /// `EVENTHUB_AUTO_REFRESH` (`true`/`false`).
    pub fn from_env() -> Result<Self, Error> {
        let mut options = Self::default();

        if let Ok(value) = std::env::var("EVENTHUB_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| {
                Error::config(format!("invalid EVENTHUB_REQUEST_TIMEOUT_SECS: {}", value))
            })?;
            options.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Ok(value) = std::env::var("EVENTHUB_AUTO_REFRESH") {
            options.auto_refresh_token = parse_flag(&value).ok_or_else(|| {
                Error::config(format!("invalid EVENTHUB_AUTO_REFRESH: {}", value))
            })?;
        }

        Ok(options)
    }

    /// Set whether to automatically refresh the token
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    /// Set whether to refresh and retry once on a 401 response
    pub fn with_retry_on_unauthorized(mut self, value: bool) -> Self {
        self.retry_on_unauthorized = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the scheduling rules
    pub fn with_scheduling_rules(mut self, value: SchedulingRules) -> Self {
        self.scheduling = value;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
