//! Timeline command: chronological event listing.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use si_core::SessionAnalysis;
use si_core::aggregate::{TimelineOptions, TimelineReport, timeline};

use super::util::{clip, format_time, push_line};

const DETAIL_WIDTH: usize = 50;

/// Prefix flagging permission denials and errors.
fn marked(kind: &str) -> String {
    if kind.contains("rejected") || kind.contains("blocked") {
        format!("[!] {kind}")
    } else if kind.contains("error") {
        format!("[E] {kind}")
    } else {
        kind.to_string()
    }
}

pub fn format_timeline<Tz: TimeZone>(report: &TimelineReport, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut output = String::new();

    writeln!(output, "Events: {}", report.events.len()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "{:<12} {:<25} {:<15} Detail", "Time", "Event", "Tool").unwrap();
    writeln!(output, "{}", "-".repeat(90)).unwrap();
    for event in &report.events {
        push_line(
            &mut output,
            &format!(
                "{:<12} {:<25} {:<15} {}",
                format_time(&event.timestamp, tz),
                marked(&event.kind),
                event.tool,
                clip(&event.detail, DETAIL_WIDTH)
            ),
        );
    }

    output
}

pub fn format_timeline_json(report: &TimelineReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.events)?)
}

/// Runs the timeline command.
pub fn run<W: Write>(
    writer: &mut W,
    sessions: &[SessionAnalysis],
    options: &TimelineOptions,
    json: bool,
) -> Result<()> {
    let report = timeline::build(sessions, options);

    if json {
        writeln!(writer, "{}", format_timeline_json(&report)?)?;
    } else {
        write!(writer, "{}", format_timeline(&report, &Local))?;
    }
    Ok(())
}
