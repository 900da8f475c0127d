//! Time conflict validation for event sessions

use std::fmt;

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use log::debug;

use super::duration::humanize_minutes;
use super::timestamp::parse_timestamp;
use super::types::{EventWindow, ExistingSession, TimeWindow, ValidationResult};
use crate::config::SchedulingRules;

/// A single finding produced while validating a session window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleIssue {
    /// A candidate timestamp could not be parsed
    InvalidDates,
    StartNotInFuture,
    EndNotAfterStart,
    TooShort { min_minutes: i64 },
    TooLong { max_minutes: i64 },
    OutsideBusinessHours { start_hour: u32, end_hour: u32 },
    CrossesMidnight,
    StartsBeforeEvent,
    EndsAfterEvent,
    /// Start or end minute is not on a slot boundary
    Misaligned { slot_minutes: u32 },
    Overlaps(Vec<String>),
    /// Sessions closer than the buffer without overlapping (warning only)
    TooClose { buffer_minutes: i64, titles: Vec<String> },
}

impl fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDates => write!(f, "Las fechas deben ser válidas"),
            Self::StartNotInFuture => write!(f, "La sesión debe comenzar en el futuro"),
            Self::EndNotAfterStart => write!(
                f,
                "La hora de fin debe ser posterior a la hora de inicio"
            ),
            Self::TooShort { min_minutes } => write!(
                f,
                "La duración mínima es de {}",
                humanize_minutes(*min_minutes)
            ),
            Self::TooLong { max_minutes } => write!(
                f,
                "La duración máxima es de {}",
                humanize_minutes(*max_minutes)
            ),
            Self::OutsideBusinessHours {
                start_hour,
                end_hour,
            } => write!(
                f,
                "La sesión debe realizarse entre las {}:00 y las {}:00",
                start_hour, end_hour
            ),
            Self::CrossesMidnight => {
                write!(f, "La sesión debe comenzar y terminar el mismo día")
            }
            Self::StartsBeforeEvent => write!(
                f,
                "La sesión no puede comenzar antes del inicio del evento"
            ),
            Self::EndsAfterEvent => write!(
                f,
                "La sesión no puede terminar después del fin del evento"
            ),
            Self::Misaligned { slot_minutes } => {
                let step = (*slot_minutes).max(1) as usize;
                let allowed: Vec<String> =
                    (0..60).step_by(step).map(|m| format!(":{:02}", m)).collect();
                write!(
                    f,
                    "Las horas de inicio y fin deben ser en {}",
                    allowed.join(" o ")
                )
            }
            Self::Overlaps(titles) => {
                write!(f, "Conflicto de horario con: {}", titles.join(", "))
            }
            Self::TooClose {
                buffer_minutes,
                titles,
            } => write!(
                f,
                "Hay sesiones a menos de {} de distancia: {}",
                humanize_minutes(*buffer_minutes),
                titles.join(", ")
            ),
        }
    }
}

/// Checks proposed session windows against [`SchedulingRules`]
#[derive(Debug, Clone, Default)]
pub struct SessionValidator {
    rules: SchedulingRules,
    exclude_id: Option<String>,
    now: Option<NaiveDateTime>,
}

impl SessionValidator {
    /// Create a validator with the given rules
    pub fn new(rules: SchedulingRules) -> Self {
        Self {
            rules,
            exclude_id: None,
            now: None,
        }
    }

    /// Ignore the existing session with this id (the one being edited)
    pub fn excluding(mut self, session_id: impl Into<String>) -> Self {
        self.exclude_id = Some(session_id.into());
        self
    }

    /// Evaluate the future-start rule against a fixed instant instead of the clock
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Validate a candidate window.
    ///
    /// Every rule runs and contributes to the result; only unparseable
    /// candidate timestamps stop validation early.
    pub fn validate(
        &self,
        candidate: &TimeWindow,
        existing: &[ExistingSession],
        event: Option<&EventWindow>,
    ) -> ValidationResult {
        let (start, end) = match (
            parse_timestamp(&candidate.start_time),
            parse_timestamp(&candidate.end_time),
        ) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return ValidationResult::new(
                    vec![ScheduleIssue::InvalidDates.to_string()],
                    Vec::new(),
                )
            }
        };

        let now = self.now.unwrap_or_else(|| Local::now().naive_local());
        let rules = &self.rules;
        let mut errors = Vec::new();

        if start <= now {
            errors.push(ScheduleIssue::StartNotInFuture);
        }

        if end <= start {
            errors.push(ScheduleIssue::EndNotAfterStart);
        }

        let seconds = (end - start).num_seconds();
        if seconds < rules.min_duration_minutes * 60 {
            errors.push(ScheduleIssue::TooShort {
                min_minutes: rules.min_duration_minutes,
            });
        }
        if seconds > rules.max_duration_minutes * 60 {
            errors.push(ScheduleIssue::TooLong {
                max_minutes: rules.max_duration_minutes,
            });
        }

        // Hour-of-day only: 22:45 still counts as hour 22.
        if start.hour() < rules.business_start_hour || end.hour() > rules.business_end_hour {
            errors.push(ScheduleIssue::OutsideBusinessHours {
                start_hour: rules.business_start_hour,
                end_hour: rules.business_end_hour,
            });
        }

        if start.date() != end.date() {
            errors.push(ScheduleIssue::CrossesMidnight);
        }

        if let Some(event) = event {
            if let Some(event_start) = parse_timestamp(&event.event_start_date) {
                if start < event_start {
                    errors.push(ScheduleIssue::StartsBeforeEvent);
                }
            }
            if let Some(event_end) = parse_timestamp(&event.event_end_date) {
                if end > event_end {
                    errors.push(ScheduleIssue::EndsAfterEvent);
                }
            }
        }

        if rules.slot_minutes > 0 {
            for boundary in [start, end] {
                if boundary.minute() % rules.slot_minutes != 0 {
                    errors.push(ScheduleIssue::Misaligned {
                        slot_minutes: rules.slot_minutes,
                    });
                }
            }
        }

        let (conflicts, nearby) = self.neighbours(start, end, existing);
        if !conflicts.is_empty() {
            errors.push(ScheduleIssue::Overlaps(conflicts));
        }

        let mut warnings = Vec::new();
        if !nearby.is_empty() {
            warnings.push(ScheduleIssue::TooClose {
                buffer_minutes: rules.buffer_minutes,
                titles: nearby,
            });
        }

        ValidationResult::new(
            errors.iter().map(ToString::to_string).collect(),
            warnings.iter().map(ToString::to_string).collect(),
        )
    }

    /// Split existing sessions into overlapping ones and buffer-only neighbours
    fn neighbours(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        existing: &[ExistingSession],
    ) -> (Vec<String>, Vec<String>) {
        let buffer = Duration::minutes(self.rules.buffer_minutes);
        let (buffer_start, buffer_end) = (start - buffer, end + buffer);

        let mut conflicts = Vec::new();
        let mut nearby = Vec::new();

        for session in existing {
            if self.exclude_id.as_deref() == Some(session.id.as_str()) {
                continue;
            }

            let (session_start, session_end) = match (
                parse_timestamp(&session.start_time),
                parse_timestamp(&session.end_time),
            ) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    debug!(
                        "Skipping session {} with unparseable window {} - {}",
                        session.id, session.start_time, session.end_time
                    );
                    continue;
                }
            };

            if start < session_end && end > session_start {
                conflicts.push(session.title.clone());
            } else if buffer_start < session_end && buffer_end > session_start {
                nearby.push(session.title.clone());
            }
        }

        (conflicts, nearby)
    }
}

/// Validate a session window with the default rules against the local clock
pub fn validate(
    candidate: &TimeWindow,
    existing: &[ExistingSession],
    event: Option<&EventWindow>,
) -> ValidationResult {
    SessionValidator::default().validate(candidate, existing, event)
}

/// Validate a session window with the default rules as of `now`
pub fn validate_at(
    candidate: &TimeWindow,
    existing: &[ExistingSession],
    event: Option<&EventWindow>,
    now: NaiveDateTime,
) -> ValidationResult {
    SessionValidator::default()
        .at(now)
        .validate(candidate, existing, event)
}
