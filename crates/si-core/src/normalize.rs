//! Single-pass extraction of typed events from decoded records.

use serde::Serialize;
use serde_json::Value;

use crate::event::{ResultPayload, SessionEvent, SystemNotice, ToolInvocation, ToolResult};
use crate::record::{AssistantRecord, RawRecord, RecordBody, SystemRecord, UserRecord};
use crate::text;

/// Record-level counters gathered while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    /// User records without a tool result back-reference.
    pub user_messages: usize,
    /// Assistant records, whatever their content.
    pub assistant_turns: usize,
    /// Earliest non-empty timestamp across all records.
    pub first_timestamp: Option<String>,
    /// Latest non-empty timestamp across all records.
    pub last_timestamp: Option<String>,
}

impl RecordStats {
    fn observe_timestamp(&mut self, ts: &str) {
        if ts.is_empty() {
            return;
        }
        if self.first_timestamp.as_deref().is_none_or(|first| ts < first) {
            self.first_timestamp = Some(ts.to_string());
        }
        if self.last_timestamp.as_deref().is_none_or(|last| ts > last) {
            self.last_timestamp = Some(ts.to_string());
        }
    }
}

/// All events of one session, in source order.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSession {
    pub events: Vec<SessionEvent>,
    pub stats: RecordStats,
}

impl NormalizedSession {
    pub fn invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.events.iter().filter_map(|e| match e {
            SessionEvent::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    pub fn results(&self) -> impl Iterator<Item = &ToolResult> {
        self.events.iter().filter_map(|e| match e {
            SessionEvent::ToolResult(result) => Some(result),
            _ => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &SystemNotice> {
        self.events.iter().filter_map(|e| match e {
            SessionEvent::Notice(notice) => Some(notice),
            _ => None,
        })
    }
}

/// Walk `records` once and extract every event family.
pub fn normalize(records: &[RawRecord]) -> NormalizedSession {
    let mut session = NormalizedSession::default();

    for record in records {
        let timestamp = record.timestamp_or_empty();
        session.stats.observe_timestamp(timestamp);

        match &record.body {
            RecordBody::Assistant(assistant) => {
                session.stats.assistant_turns += 1;
                push_assistant_events(&mut session.events, record, assistant);
            }
            RecordBody::User(user) => {
                if user.result_reference().is_none() {
                    session.stats.user_messages += 1;
                }
                if let Some(event) = user_event(user, timestamp) {
                    session.events.push(event);
                }
            }
            RecordBody::System(system) => {
                if let Some(notice) = system_notice(system, timestamp) {
                    session.events.push(SessionEvent::Notice(notice));
                }
            }
            RecordBody::Other { .. } => {}
        }
    }

    session
}

fn push_assistant_events(
    events: &mut Vec<SessionEvent>,
    record: &RawRecord,
    assistant: &AssistantRecord,
) {
    let Some(blocks) = &assistant.content else {
        return;
    };
    let timestamp = record.timestamp_or_empty();

    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("tool_use") => {
                let tool_name = block
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                let input = block
                    .get("input")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
                let command = (tool_name == "Bash").then(|| {
                    input
                        .get("command")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                });

                events.push(SessionEvent::ToolCall(ToolInvocation {
                    tool_name,
                    tool_use_id: block.get("id").and_then(Value::as_str).map(String::from),
                    input,
                    command,
                    invoking_record_id: record.uuid.clone().unwrap_or_default(),
                    timestamp: timestamp.to_string(),
                }));
            }
            Some("text") => {
                let text = block.get("text").and_then(Value::as_str).unwrap_or("");
                if !text.trim().is_empty() {
                    events.push(SessionEvent::AssistantText {
                        text: text.to_string(),
                        timestamp: timestamp.to_string(),
                    });
                }
            }
            _ => {}
        }
    }
}

fn user_event(user: &UserRecord, timestamp: &str) -> Option<SessionEvent> {
    if let (Some(reference), Some(raw)) = (user.result_reference(), &user.tool_use_result) {
        let payload = ResultPayload::from_value(raw.clone())?;
        return Some(SessionEvent::ToolResult(ToolResult {
            source_invocation_ref: reference.to_string(),
            tool_use_id: answered_tool_use_id(user.message.as_ref()),
            payload,
            timestamp: timestamp.to_string(),
        }));
    }

    let message = user.message.as_ref().filter(|m| !is_empty_value(m))?;
    let text = message_text(message);
    if text.trim().is_empty() {
        return None;
    }
    Some(SessionEvent::UserMessage {
        text,
        timestamp: timestamp.to_string(),
    })
}

/// `tool_use_id` of the first `tool_result` block in a user message.
fn answered_tool_use_id(message: Option<&Value>) -> Option<String> {
    message?
        .get("content")?
        .as_array()?
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("tool_result"))
        .find_map(|b| b.get("tool_use_id").and_then(Value::as_str))
        .map(String::from)
}

/// Text of a user message: a plain string body, or its text blocks joined by spaces.
fn message_text(message: &Value) -> String {
    match message.get("content") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(blocks)) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .map(|b| b.get("text").and_then(Value::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" "),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn system_notice(system: &SystemRecord, timestamp: &str) -> Option<SystemNotice> {
    let timestamp = timestamp.to_string();
    match system.subtype.as_deref()? {
        "stop_hook_summary" => Some(SystemNotice::StopHookSummary {
            timestamp,
            hook_count: system.hook_count,
            error_count: system.hook_errors.len(),
            hook_commands: system
                .hook_infos
                .iter()
                .map(|info| {
                    info.get("command")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string()
                })
                .collect(),
            prevented_continuation: system.prevented_continuation,
        }),
        "turn_duration" => {
            let ms = system.duration_ms.filter(|ms| ms.is_finite() && *ms > 0.0)?;
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "positive and finite, checked above"
            )]
            let duration_ms = ms.round() as u64;
            Some(SystemNotice::TurnDuration {
                timestamp,
                duration_ms,
            })
        }
        "api_error" => Some(SystemNotice::ApiError {
            timestamp,
            message: system.message.as_ref().map(text::compact).unwrap_or_default(),
        }),
        _ => None,
    }
}
