//! Chronological event timeline across sessions.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::keep_last;
use crate::analyze::SessionAnalysis;
use crate::classify::classify;
use crate::event::{ResultPayload, SessionEvent, SystemNotice, ToolInvocation};
use crate::text;

const TOOL_DETAIL_LENGTH: usize = 60;
const SHORT_DETAIL_LENGTH: usize = 40;
const RESULT_PREVIEW_LENGTH: usize = 60;
const MESSAGE_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub timestamp: String,
    /// `tool_call`, `tool_result:<class>`, `assistant_text`, `user_message`,
    /// `hook:<subtype>`, `turn_duration` or `api_error`.
    pub kind: String,
    /// Empty when the event has no associated tool.
    pub tool: String,
    pub detail: String,
    pub project: String,
}

impl TimelineEntry {
    fn matches(&self, needle_lower: &str) -> bool {
        [&self.kind, &self.tool, &self.detail]
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Case-insensitive substring matched against kind, tool or detail.
    pub filter: Option<String>,
    /// Keep only the last N entries, applied after filtering.
    pub last: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineReport {
    pub events: Vec<TimelineEntry>,
}

/// Merge the events of every session into one timeline.
///
/// Entries are stably sorted by timestamp (ties keep session order, then
/// source order), then filtered, then truncated.
pub fn build(sessions: &[SessionAnalysis], options: &TimelineOptions) -> TimelineReport {
    let mut events: Vec<TimelineEntry> = sessions.iter().flat_map(session_entries).collect();

    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    if let Some(filter) = options.filter.as_deref().filter(|f| !f.is_empty()) {
        let needle = filter.to_lowercase();
        events.retain(|e| e.matches(&needle));
    }
    keep_last(&mut events, options.last);

    TimelineReport { events }
}

fn session_entries(analysis: &SessionAnalysis) -> Vec<TimelineEntry> {
    // Tool name for each result that found its invocation.
    let result_tools: HashMap<usize, &str> = analysis
        .invocations
        .iter()
        .filter_map(|r| Some((r.result_index?, r.invocation.tool_name.as_str())))
        .collect();

    let project = analysis.source.project.as_str();
    let mut result_index = 0;
    let mut entries = Vec::with_capacity(analysis.session.events.len());

    for event in &analysis.session.events {
        let (kind, tool, detail) = match event {
            SessionEvent::ToolCall(call) => (
                "tool_call".to_string(),
                call.tool_name.clone(),
                tool_detail(call),
            ),
            SessionEvent::ToolResult(result) => {
                let tool = result_tools.get(&result_index).copied().unwrap_or("");
                result_index += 1;
                (
                    format!("tool_result:{}", classify(Some(&result.payload))),
                    tool.to_string(),
                    result_preview(&result.payload),
                )
            }
            SessionEvent::AssistantText { text, .. } => (
                "assistant_text".to_string(),
                String::new(),
                text::one_line(text, MESSAGE_LENGTH),
            ),
            SessionEvent::UserMessage { text, .. } => (
                "user_message".to_string(),
                String::new(),
                text::one_line(text, MESSAGE_LENGTH),
            ),
            SessionEvent::Notice(notice) => {
                let (kind, detail) = notice_entry(notice);
                (kind, String::new(), detail)
            }
        };

        entries.push(TimelineEntry {
            timestamp: event.timestamp().to_string(),
            kind,
            tool,
            detail,
            project: project.to_string(),
        });
    }

    entries
}

fn input_str<'a>(input: &'a Value, key: &str) -> &'a str {
    input.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Short description of what a tool call does.
pub(crate) fn tool_detail(call: &ToolInvocation) -> String {
    let input = &call.input;
    match call.tool_name.as_str() {
        "Bash" => text::one_line(input_str(input, "command"), TOOL_DETAIL_LENGTH),
        "Read" | "Write" | "Edit" => text::basename(input_str(input, "file_path")).to_string(),
        "Glob" => input_str(input, "pattern").to_string(),
        "Grep" => text::excerpt(input_str(input, "pattern"), SHORT_DETAIL_LENGTH),
        "Task" => text::excerpt(input_str(input, "description"), SHORT_DETAIL_LENGTH),
        "Skill" => input_str(input, "skill").to_string(),
        _ => text::excerpt(&text::compact(input), SHORT_DETAIL_LENGTH),
    }
}

/// Short preview of a tool result.
pub(crate) fn result_preview(payload: &ResultPayload) -> String {
    match payload {
        ResultPayload::Text(s) => text::one_line(s, RESULT_PREVIEW_LENGTH),
        ResultPayload::Structured(map) => {
            if let Some(stdout) = map.get("stdout") {
                return text::one_line(&text::compact(stdout), RESULT_PREVIEW_LENGTH);
            }
            if let Some(Value::Object(file)) = map.get("file") {
                let path = file.get("filePath").and_then(Value::as_str).unwrap_or("");
                return format!("file: {}", text::basename(path));
            }
            if let Some(path) = map.get("filePath").and_then(Value::as_str) {
                return format!("edited: {}", text::basename(path));
            }
            text::excerpt(&Value::Object(map.clone()).to_string(), RESULT_PREVIEW_LENGTH)
        }
        ResultPayload::Other(value) => text::excerpt(&value.to_string(), RESULT_PREVIEW_LENGTH),
    }
}

fn notice_entry(notice: &SystemNotice) -> (String, String) {
    match notice {
        SystemNotice::StopHookSummary {
            error_count,
            hook_commands,
            prevented_continuation,
            ..
        } => {
            let mut parts = Vec::new();
            if *error_count > 0 {
                parts.push(format!("errors={error_count}"));
            }
            if !hook_commands.is_empty() {
                let commands: Vec<String> = hook_commands
                    .iter()
                    .map(|c| text::excerpt(c, SHORT_DETAIL_LENGTH))
                    .collect();
                parts.push(format!("hooks=[{}]", commands.join(", ")));
            }
            if *prevented_continuation {
                parts.push("PREVENTED".to_string());
            }
            ("hook:stop_hook_summary".to_string(), parts.join(" "))
        }
        SystemNotice::TurnDuration { duration_ms, .. } => {
            #[allow(clippy::cast_precision_loss)]
            let seconds = *duration_ms as f64 / 1000.0;
            ("turn_duration".to_string(), format!("{seconds:.1}s"))
        }
        SystemNotice::ApiError { message, .. } => (
            "api_error".to_string(),
            text::excerpt(message, MESSAGE_LENGTH),
        ),
    }
}
