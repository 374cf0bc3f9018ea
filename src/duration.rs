//! Duration parsing for the two encodings search results use
//!
//! Durations arrive either ISO-8601 style (`PT7H25M`) or human readable
//! (`7h 25m`). Parsing is lenient: whatever cannot be read contributes zero.

use regex::Regex;
use std::sync::OnceLock;

/// Result of classifying a duration string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedDuration {
    /// `PT` prefixed, `<digits>H` / `<digits>M` tokens
    Iso8601 { hours: f64, minutes: f64 },
    /// `<digits>h` / `<digits>m` tokens
    Human { hours: f64, minutes: f64 },
    /// Absent, empty, or no recognizable token
    Unparseable,
}

impl ParsedDuration {
    /// Fractional hours; `Unparseable` counts as zero.
    pub fn hours(&self) -> f64 {
        match *self {
            ParsedDuration::Iso8601 { hours, minutes } | ParsedDuration::Human { hours, minutes } => {
                hours + minutes / 60.0
            }
            ParsedDuration::Unparseable => 0.0,
        }
    }
}

fn iso_hours_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)H").expect("valid ISO hours pattern"))
}

fn iso_minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)M").expect("valid ISO minutes pattern"))
}

fn human_hours_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)h").expect("valid hours pattern"))
}

fn human_minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)m").expect("valid minutes pattern"))
}

// Digit runs too long for an integer still keep their magnitude
fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Classify a duration string. ISO is tried first, then the human form.
pub fn parse_duration(duration: Option<&str>) -> ParsedDuration {
    let text = match duration.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return ParsedDuration::Unparseable,
    };

    if text.starts_with("PT") {
        return ParsedDuration::Iso8601 {
            hours: capture_number(iso_hours_re(), text).unwrap_or(0.0),
            minutes: capture_number(iso_minutes_re(), text).unwrap_or(0.0),
        };
    }

    match (
        capture_number(human_hours_re(), text),
        capture_number(human_minutes_re(), text),
    ) {
        (None, None) => ParsedDuration::Unparseable,
        (hours, minutes) => ParsedDuration::Human {
            hours: hours.unwrap_or(0.0),
            minutes: minutes.unwrap_or(0.0),
        },
    }
}

/// Fractional hours for a duration string, 0 when absent or unreadable
pub fn duration_hours(duration: Option<&str>) -> f64 {
    parse_duration(duration).hours()
}

/// Split fractional hours into whole hours and rounded minutes.
///
/// A remainder that rounds to 60 minutes is carried into the hour.
pub fn split_hours(hours: f64) -> (u64, u64) {
    let hours = if hours.is_finite() { hours.abs() } else { 0.0 };
    let mut whole = hours.floor() as u64;
    let mut minutes = ((hours - hours.floor()) * 60.0).round() as u64;
    if minutes >= 60 {
        whole += 1;
        minutes -= 60;
    }
    (whole, minutes)
}

/// Render an ISO duration (`PT3H30M`) as `3h 30m`.
///
/// Empty input renders as `N/A`; anything that is not ISO is returned as is.
pub fn format_iso_duration(duration: &str) -> String {
    let trimmed = duration.trim();
    if trimmed.is_empty() {
        return "N/A".to_string();
    }
    match parse_duration(Some(trimmed)) {
        ParsedDuration::Iso8601 { hours, minutes } => format!("{}h {}m", hours, minutes),
        _ => trimmed.to_string(),
    }
}
