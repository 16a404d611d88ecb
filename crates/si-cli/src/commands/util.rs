//! Shared utilities for CLI commands.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

fn parse(ts: &str) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(ts).ok()
}

/// `HH:MM:SS` in `tz`; the first 8 characters when `ts` does not parse.
pub fn format_time<Tz: TimeZone>(ts: &str, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    if ts.is_empty() {
        return String::new();
    }
    parse(ts).map_or_else(
        || clip(ts, 8),
        |dt| dt.with_timezone(tz).format("%H:%M:%S").to_string(),
    )
}

/// `YYYY-MM-DD HH:MM:SS` in `tz`; `N/A` when missing, the raw text when unparsable.
pub fn format_datetime<Tz: TimeZone>(ts: Option<&str>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    match ts.filter(|t| !t.is_empty()) {
        None => "N/A".to_string(),
        Some(ts) => parse(ts).map_or_else(
            || ts.to_string(),
            |dt| dt.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
    }
}

/// Elapsed time between two timestamps as `Xh Ymin`.
pub fn format_span(start: Option<&str>, end: Option<&str>) -> String {
    let (Some(start), Some(end)) = (start.and_then(parse), end.and_then(parse)) else {
        return "N/A".to_string();
    };
    let minutes = (end - start).num_minutes();
    format!("{}h {}min", minutes.div_euclid(60), minutes.rem_euclid(60))
}

/// At most `max` characters of `s`.
pub fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Append `line` with trailing padding removed.
pub fn push_line(output: &mut String, line: &str) {
    output.push_str(line.trim_end());
    output.push('\n');
}
