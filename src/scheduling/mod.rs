//! Session scheduling checks
//!
//! Validates a proposed session window against the scheduling rules, the
//! parent event's window and the sessions already scheduled for that event,
//! and renders session durations for display.

mod duration;
mod timestamp;
mod types;
mod validator;

pub use duration::*;
pub use timestamp::parse_timestamp;
pub use types::*;
pub use validator::*;
