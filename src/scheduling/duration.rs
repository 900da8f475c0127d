//! Human-readable session durations

use super::timestamp::parse_timestamp;

fn plural(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Render a number of minutes as hours and minutes, e.g. `1 hora y 30 minutos`
pub fn humanize_minutes(minutes: i64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;

    match (hours, rest) {
        (0, m) => plural(m, "minuto", "minutos"),
        (h, 0) => plural(h, "hora", "horas"),
        (h, m) => format!(
            "{} y {}",
            plural(h, "hora", "horas"),
            plural(m, "minuto", "minutos")
        ),
    }
}

/// Format the length of the window between two timestamps.
///
/// Partial minutes are dropped. Returns `None` when either timestamp fails to
/// parse or the end precedes the start.
pub fn format_duration(start_time: &str, end_time: &str) -> Option<String> {
    let start = parse_timestamp(start_time)?;
    let end = parse_timestamp(end_time)?;

    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        return None;
    }

    Some(humanize_minutes(minutes))
}
