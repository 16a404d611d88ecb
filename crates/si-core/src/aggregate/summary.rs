//! Per-session overview.

use serde::Serialize;

use super::{OutcomeCounts, count_by};
use crate::analyze::SessionAnalysis;
use crate::event::SystemNotice;

/// Tools listed in a summary.
const TOP_TOOLS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub user_messages: usize,
    pub assistant_turns: usize,
    pub tool_calls: usize,
    pub outcomes: OutcomeCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCount {
    pub tool: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Session id.
    pub source: String,
    pub project: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub counts: SummaryCounts,
    /// Milliseconds, in record order.
    pub turn_durations: Vec<u64>,
    pub hook_events: usize,
    pub hook_errors: usize,
    pub top_tools: Vec<ToolCount>,
    pub malformed_lines: usize,
    pub unmatched_results: usize,
}

impl SessionSummary {
    /// Mean turn duration in milliseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_turn_ms(&self) -> Option<f64> {
        if self.turn_durations.is_empty() {
            return None;
        }
        let total: u64 = self.turn_durations.iter().sum();
        Some(total as f64 / self.turn_durations.len() as f64)
    }
}

pub fn build(analysis: &SessionAnalysis) -> SessionSummary {
    let stats = &analysis.session.stats;

    let mut outcomes = OutcomeCounts::default();
    for call in &analysis.invocations {
        outcomes.add(call.outcome);
    }

    let mut turn_durations = Vec::new();
    let mut hook_events = 0;
    let mut hook_errors = 0;
    for notice in analysis.session.notices() {
        match notice {
            SystemNotice::TurnDuration { duration_ms, .. } => turn_durations.push(*duration_ms),
            SystemNotice::StopHookSummary { error_count, .. } => {
                hook_events += 1;
                hook_errors += error_count;
            }
            SystemNotice::ApiError { .. } => {}
        }
    }

    let top_tools = count_by(
        analysis
            .invocations
            .iter()
            .map(|c| c.invocation.tool_name.as_str()),
    )
    .into_iter()
    .take(TOP_TOOLS)
    .map(|(tool, count)| ToolCount { tool, count })
    .collect();

    SessionSummary {
        source: analysis.source.session_id.clone(),
        project: analysis.source.project.clone(),
        start: stats.first_timestamp.clone(),
        end: stats.last_timestamp.clone(),
        counts: SummaryCounts {
            user_messages: stats.user_messages,
            assistant_turns: stats.assistant_turns,
            tool_calls: analysis.invocations.len(),
            outcomes,
        },
        turn_durations,
        hook_events,
        hook_errors,
        top_tools,
        malformed_lines: analysis.malformed_lines,
        unmatched_results: analysis.unmatched_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{bash_call, result, session, tool_call};

    #[test]
    fn test_summary_counts() {
        let s = session(
            "fleet",
            "abc",
            &[
                r#"{"type":"user","timestamp":"2026-01-29T09:59:00Z","message":{"content":"go"}}"#,
                &bash_call("a1", "2026-01-29T10:00:00Z", "ls"),
                &result("a1", "2026-01-29T10:00:01Z", r#"{"stdout":""}"#),
                &bash_call("a2", "2026-01-29T10:00:02Z", "rm x"),
                &result("a2", "2026-01-29T10:00:03Z", r#""User rejected tool use""#),
                &tool_call("a3", "2026-01-29T10:00:04Z", "Read", "{}"),
                r#"{"type":"system","subtype":"turn_duration","timestamp":"2026-01-29T10:00:05Z","durationMs":2000}"#,
                r#"{"type":"system","subtype":"turn_duration","timestamp":"2026-01-29T10:00:06Z","durationMs":4000}"#,
                r#"{"type":"system","subtype":"stop_hook_summary","timestamp":"2026-01-29T10:00:07Z","hookErrors":["a","b"]}"#,
                r#"{"type":"system","subtype":"stop_hook_summary","timestamp":"2026-01-29T10:00:08Z"}"#,
                r#"{"type":"user","uuid":"x","timestamp":"2026-01-29T10:00:09Z","sourceToolAssistantUUID":"gone","toolUseResult":"ok"}"#,
                "not json",
            ],
        );

        let summary = build(&s);

        assert_eq!(summary.source, "abc");
        assert_eq!(summary.project, "fleet");
        assert_eq!(summary.start.as_deref(), Some("2026-01-29T09:59:00Z"));
        assert_eq!(summary.end.as_deref(), Some("2026-01-29T10:00:09Z"));
        assert_eq!(summary.counts.user_messages, 1);
        assert_eq!(summary.counts.assistant_turns, 3);
        assert_eq!(summary.counts.tool_calls, 3);
        assert_eq!(summary.counts.outcomes.success, 1);
        assert_eq!(summary.counts.outcomes.user_rejected, 1);
        assert_eq!(summary.counts.outcomes.pending, 1);
        assert_eq!(summary.counts.outcomes.total(), summary.counts.tool_calls);
        assert_eq!(summary.turn_durations, vec![2000, 4000]);
        assert_eq!(summary.average_turn_ms(), Some(3000.0));
        assert_eq!(summary.hook_events, 2);
        assert_eq!(summary.hook_errors, 2);
        assert_eq!(
            summary.top_tools,
            vec![
                ToolCount {
                    tool: "Bash".to_string(),
                    count: 2
                },
                ToolCount {
                    tool: "Read".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(summary.malformed_lines, 1);
        assert_eq!(summary.unmatched_results, 1);
    }

    #[test]
    fn test_empty_session() {
        let summary = build(&session("demo", "empty", &[]));

        assert_eq!(summary.start, None);
        assert_eq!(summary.end, None);
        assert_eq!(summary.counts, SummaryCounts::default());
        assert_eq!(summary.average_turn_ms(), None);
        assert!(summary.top_tools.is_empty());
    }

    #[test]
    fn test_top_tools_capped() {
        let lines: Vec<String> = (0..12)
            .map(|i| tool_call(&format!("a{i}"), "t", &format!("Tool{i}"), "{}"))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

        let summary = build(&session("demo", "s1", &refs));

        assert_eq!(summary.counts.tool_calls, 12);
        assert_eq!(summary.top_tools.len(), 10);
        assert_eq!(summary.top_tools[0].tool, "Tool0");
    }
}
