//! Permissions command: outcomes per tool or shell command.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use si_core::aggregate::permissions::{self, AUTO_APPROVE_MIN_CALLS};
use si_core::aggregate::PermissionReport;
use si_core::{OutcomeClass, SessionAnalysis};

use super::util::push_line;

/// Formats the report as human-readable text.
///
/// `brief` leaves out the table of every group.
pub fn format_permissions(report: &PermissionReport, brief: bool) -> String {
    let mut output = String::new();
    let totals = &report.totals;

    writeln!(output, "Sessions analyzed: {}", report.sessions).unwrap();
    writeln!(output, "Total tool calls:  {}", totals.calls).unwrap();
    writeln!(output, "  Success:         {}", totals.outcomes.success).unwrap();
    writeln!(output, "  User rejected:   {}", totals.outcomes.user_rejected).unwrap();
    writeln!(output, "  DCG blocked:     {}", totals.outcomes.dcg_blocked).unwrap();
    writeln!(output, "  Tool errors:     {}", totals.outcomes.error).unwrap();
    writeln!(output).unwrap();

    let blocked: Vec<_> = report.blocked().collect();
    if !blocked.is_empty() {
        writeln!(output, "--- DCG BLOCKED ---").unwrap();
        writeln!(output, "{:<40} {:>8} {:>8}", "Tool/Command", "Blocked", "Total").unwrap();
        writeln!(output, "{}", "-".repeat(58)).unwrap();
        for group in blocked {
            writeln!(
                output,
                "{:<40} {:>8} {:>8}",
                group.key, group.outcomes.dcg_blocked, group.total
            )
            .unwrap();
            for example in group
                .examples
                .iter()
                .filter(|e| e.class == OutcomeClass::DcgBlocked)
            {
                writeln!(output, "  -> {}", example.detail).unwrap();
            }
        }
        writeln!(output).unwrap();
    }

    let rejected: Vec<_> = report.rejected().collect();
    if !rejected.is_empty() {
        writeln!(output, "--- USER REJECTED ---").unwrap();
        writeln!(
            output,
            "{:<40} {:>8} {:>8} {:>8}",
            "Tool/Command", "Rejected", "Total", "Rate"
        )
        .unwrap();
        writeln!(output, "{}", "-".repeat(66)).unwrap();
        for group in rejected {
            writeln!(
                output,
                "{:<40} {:>8} {:>8} {:>7.0}%",
                group.key,
                group.outcomes.user_rejected,
                group.total,
                group.success_rate() * 100.0
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    let candidates: Vec<_> = report.auto_approve_candidates().collect();
    if !candidates.is_empty() {
        writeln!(
            output,
            "--- AUTO-APPROVE CANDIDATES (100% success, {AUTO_APPROVE_MIN_CALLS}+ calls) ---"
        )
        .unwrap();
        writeln!(output, "{:<40} {:>8}", "Tool/Command", "Count").unwrap();
        writeln!(output, "{}", "-".repeat(50)).unwrap();
        for group in candidates {
            writeln!(output, "{:<40} {:>8}", group.key, group.total).unwrap();
        }
        writeln!(output).unwrap();
    }

    if !brief {
        writeln!(output, "--- ALL TOOL CALLS ---").unwrap();
        writeln!(
            output,
            "{:<35} {:>6} {:>6} {:>7} {:>5} {:>6}",
            "Tool/Command", "Total", "OK", "Reject", "DCG", "Error"
        )
        .unwrap();
        writeln!(output, "{}", "-".repeat(67)).unwrap();
        for group in &report.groups {
            let o = &group.outcomes;
            push_line(
                &mut output,
                &format!(
                    "{:<35} {:>6} {:>6} {:>7} {:>5} {:>6}",
                    group.key, group.total, o.success, o.user_rejected, o.dcg_blocked, o.error
                ),
            );
        }
    }

    output
}

/// Formats the report as JSON.
pub fn format_permissions_json(report: &PermissionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Runs the permissions command.
pub fn run<W: Write>(
    writer: &mut W,
    sessions: &[SessionAnalysis],
    json: bool,
    brief: bool,
) -> Result<()> {
    let report = permissions::build(sessions);

    if json {
        writeln!(writer, "{}", format_permissions_json(&report)?)?;
    } else {
        write!(writer, "{}", format_permissions(&report, brief))?;
    }
    Ok(())
}
