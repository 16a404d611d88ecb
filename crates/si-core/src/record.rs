//! Loosely-typed session log records.
//!
//! A session log mixes many record shapes. Each record is keyed by its `type`
//! discriminator and exposes only the fields analysis relies on. Fields with
//! an unexpected JSON type are treated as absent rather than failing the
//! whole line, and anything unrecognized is kept in [`RawRecord::extra`].

use serde_json::{Map, Value};

/// One decoded log line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub uuid: Option<String>,
    pub timestamp: Option<String>,
    pub body: RecordBody,
    /// Fields not consumed by any [`RecordBody`] variant.
    pub extra: Map<String, Value>,
}

/// Type-specific part of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    Assistant(AssistantRecord),
    User(UserRecord),
    System(SystemRecord),
    /// Any other record type (`summary`, `progress`, snapshots, ...).
    Other { kind: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssistantRecord {
    /// `message.content` when it is a list of blocks.
    pub content: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    /// `sourceToolAssistantUUID`: the assistant record this result answers.
    pub source_tool_assistant_uuid: Option<String>,
    /// `toolUseResult`; JSON `null` is stored as `None`.
    pub tool_use_result: Option<Value>,
    pub message: Option<Value>,
}

impl UserRecord {
    /// The back-reference, if present and non-empty.
    pub fn result_reference(&self) -> Option<&str> {
        self.source_tool_assistant_uuid
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SystemRecord {
    pub subtype: Option<String>,
    pub hook_count: u64,
    pub hook_errors: Vec<Value>,
    pub hook_infos: Vec<Value>,
    pub prevented_continuation: bool,
    pub duration_ms: Option<f64>,
    pub message: Option<Value>,
}

impl RawRecord {
    /// Build a record from a decoded JSON object.
    pub fn from_object(mut map: Map<String, Value>) -> Self {
        let kind = take_string(&mut map, "type");
        let uuid = take_string(&mut map, "uuid");
        let timestamp = take_string(&mut map, "timestamp");

        let body = match kind.as_deref() {
            Some("assistant") => {
                let content = map
                    .get_mut("message")
                    .and_then(Value::as_object_mut)
                    .and_then(|m| m.remove("content"))
                    .and_then(|c| match c {
                        Value::Array(blocks) => Some(blocks),
                        _ => None,
                    });
                RecordBody::Assistant(AssistantRecord { content })
            }
            Some("user") => RecordBody::User(UserRecord {
                source_tool_assistant_uuid: take_string(&mut map, "sourceToolAssistantUUID"),
                tool_use_result: map.remove("toolUseResult").filter(|v| !v.is_null()),
                message: map.remove("message").filter(|v| !v.is_null()),
            }),
            Some("system") => RecordBody::System(SystemRecord {
                subtype: take_string(&mut map, "subtype"),
                hook_count: map
                    .remove("hookCount")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0),
                hook_errors: take_array(&mut map, "hookErrors"),
                hook_infos: take_array(&mut map, "hookInfos"),
                prevented_continuation: map
                    .remove("preventedContinuation")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
                duration_ms: map.remove("durationMs").and_then(|v| v.as_f64()),
                message: map.remove("message").filter(|v| !v.is_null()),
            }),
            _ => RecordBody::Other { kind },
        };

        Self {
            uuid,
            timestamp,
            body,
            extra: map,
        }
    }

    /// The `type` discriminator as written in the log.
    pub fn kind(&self) -> Option<&str> {
        match &self.body {
            RecordBody::Assistant(_) => Some("assistant"),
            RecordBody::User(_) => Some("user"),
            RecordBody::System(_) => Some("system"),
            RecordBody::Other { kind } => kind.as_deref(),
        }
    }

    /// Timestamp, or the empty string when absent.
    pub fn timestamp_or_empty(&self) -> &str {
        self.timestamp.as_deref().unwrap_or("")
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            // Keep the odd value around rather than silently dropping it.
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match map.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
