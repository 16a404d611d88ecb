//! Errors command: rejections, dcg blocks and tool errors grouped by class.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use si_core::aggregate::{FailureReport, failures};
use si_core::{OutcomeClass, SessionAnalysis};

use super::util::{clip, format_time, push_line};

const DETAIL_WIDTH: usize = 50;

/// Sections in display order.
const SECTIONS: [(OutcomeClass, &str); 3] = [
    (OutcomeClass::DcgBlocked, "DCG BLOCKED"),
    (OutcomeClass::UserRejected, "USER REJECTED"),
    (OutcomeClass::Error, "TOOL ERRORS"),
];

pub fn format_failures<Tz: TimeZone>(report: &FailureReport, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut output = String::new();

    writeln!(output, "Errors/Rejections: {}", report.entries.len()).unwrap();
    writeln!(output).unwrap();

    for (class, label) in SECTIONS {
        let entries: Vec<_> = report.of_class(class).collect();
        if entries.is_empty() {
            continue;
        }
        writeln!(output, "--- {label} ({}) ---", entries.len()).unwrap();
        writeln!(output, "{:<12} {:<30} Detail", "Time", "Tool").unwrap();
        writeln!(output, "{}", "-".repeat(80)).unwrap();
        for entry in entries {
            let detail = if entry.command.is_empty() {
                &entry.detail
            } else {
                &entry.command
            };
            push_line(
                &mut output,
                &format!(
                    "{:<12} {:<30} {}",
                    format_time(&entry.timestamp, tz),
                    entry.tool,
                    clip(detail, DETAIL_WIDTH)
                ),
            );
        }
        writeln!(output).unwrap();
    }

    output
}

pub fn format_failures_json(report: &FailureReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.entries)?)
}

/// Runs the errors command.
pub fn run<W: Write>(
    writer: &mut W,
    sessions: &[SessionAnalysis],
    last: Option<usize>,
    json: bool,
) -> Result<()> {
    let report = failures::build(sessions, last);

    if json {
        writeln!(writer, "{}", format_failures_json(&report)?)?;
    } else {
        write!(writer, "{}", format_failures(&report, &Local))?;
    }
    Ok(())
}
