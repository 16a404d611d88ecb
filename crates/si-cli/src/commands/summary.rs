//! Summary command: one overview block per session.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use si_core::SessionAnalysis;
use si_core::aggregate::{SessionSummary, summary};

use super::util::{format_datetime, format_span};

/// Formats summaries as human-readable text.
pub fn format_summaries<Tz: TimeZone>(summaries: &[SessionSummary], tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut output = String::new();

    for s in summaries {
        let outcomes = &s.counts.outcomes;
        let start = s.start.as_deref();
        let end = s.end.as_deref();

        writeln!(output, "Session:  {}", s.source).unwrap();
        writeln!(output, "Project:  {}", s.project).unwrap();
        writeln!(output, "Start:    {}", format_datetime(start, tz)).unwrap();
        writeln!(output, "End:      {}", format_datetime(end, tz)).unwrap();
        writeln!(output, "Duration: {}", format_span(start, end)).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "User messages:    {}", s.counts.user_messages).unwrap();
        writeln!(output, "Assistant turns:  {}", s.counts.assistant_turns).unwrap();
        writeln!(output, "Tool calls:       {}", s.counts.tool_calls).unwrap();
        writeln!(output, "  Success:        {}", outcomes.success).unwrap();
        writeln!(output, "  User rejected:  {}", outcomes.user_rejected).unwrap();
        writeln!(output, "  DCG blocked:    {}", outcomes.dcg_blocked).unwrap();
        writeln!(output, "  Errors:         {}", outcomes.error).unwrap();
        writeln!(output, "  Pending:        {}", outcomes.pending).unwrap();
        writeln!(output).unwrap();

        if let Some(avg) = s.average_turn_ms() {
            writeln!(
                output,
                "Turn durations:   {} turns, avg {:.1}s",
                s.turn_durations.len(),
                avg / 1000.0
            )
            .unwrap();
        }
        writeln!(output, "Hook events:      {}", s.hook_events).unwrap();
        if s.hook_errors > 0 {
            writeln!(output, "Hook errors:      {}", s.hook_errors).unwrap();
        }
        if s.malformed_lines > 0 {
            writeln!(output, "Malformed lines:  {}", s.malformed_lines).unwrap();
        }
        if s.unmatched_results > 0 {
            writeln!(output, "Orphan results:   {}", s.unmatched_results).unwrap();
        }

        writeln!(output).unwrap();
        writeln!(output, "Top tools:").unwrap();
        for tool in &s.top_tools {
            writeln!(output, "  {:<30} {:>5}", tool.tool, tool.count).unwrap();
        }
        writeln!(output).unwrap();
    }

    output
}

/// Formats summaries as a JSON array.
pub fn format_summaries_json(summaries: &[SessionSummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(summaries)?)
}

/// Runs the summary command.
pub fn run<W: Write>(writer: &mut W, sessions: &[SessionAnalysis], json: bool) -> Result<()> {
    let summaries: Vec<SessionSummary> = sessions.iter().map(summary::build).collect();

    if json {
        writeln!(writer, "{}", format_summaries_json(&summaries)?)?;
    } else {
        write!(writer, "{}", format_summaries(&summaries, &Local))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use insta::assert_snapshot;

    use crate::commands::testing::analysis;

    #[test]
    fn test_summary_text() {
        let session = analysis(
            "fleet",
            "abc123",
            &[
                r#"{"type":"user","timestamp":"2026-01-29T10:00:00Z","message":{"content":"go"}}"#,
                r#"{"type":"assistant","uuid":"a1","timestamp":"2026-01-29T10:00:01Z","message":{"content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"rm -rf /tmp/x"}}]}}"#,
                r#"{"type":"user","uuid":"u1","timestamp":"2026-01-29T10:00:02Z","sourceToolAssistantUUID":"a1","toolUseResult":"User rejected tool use"}"#,
                r#"{"type":"system","subtype":"turn_duration","timestamp":"2026-01-29T11:30:00Z","durationMs":1500}"#,
            ],
        );
        let summaries = vec![summary::build(&session)];

        assert_snapshot!(format_summaries(&summaries, &Utc), @r"
        Session:  abc123
        Project:  fleet
        Start:    2026-01-29 10:00:00
        End:      2026-01-29 11:30:00
        Duration: 1h 30min

        User messages:    1
        Assistant turns:  1
        Tool calls:       1
          Success:        0
          User rejected:  1
          DCG blocked:    0
          Errors:         0
          Pending:        0

        Turn durations:   1 turns, avg 1.5s
        Hook events:      0

        Top tools:
          Bash                               1
        ");
    }

    #[test]
    fn test_summary_json_is_array() {
        let session = analysis("fleet", "abc123", &[]);
        let json = format_summaries_json(&[summary::build(&session)]).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["source"], "abc123");
        assert_eq!(value[0]["counts"]["tool_calls"], 0);
        assert_eq!(value[0]["start"], serde_json::Value::Null);
    }
}
