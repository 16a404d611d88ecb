//! Normalized session events.

use serde::Serialize;
use serde_json::{Map, Value};

/// The recorded outcome payload of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultPayload {
    /// Tool output (file contents, command stdout, ...).
    Structured(Map<String, Value>),
    /// Plain text; the only shape that can carry a rejection or error.
    Text(String),
    /// Any other JSON shape (arrays, numbers, booleans).
    Other(Value),
}

impl ResultPayload {
    /// `None` for JSON `null`, which counts as no payload at all.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) => Some(Self::Structured(map)),
            Value::String(s) => Some(Self::Text(s)),
            other => Some(Self::Other(other)),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One tool call issued by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub tool_use_id: Option<String>,
    pub input: Value,
    /// `input.command` for Bash calls; `None` for every other tool.
    pub command: Option<String>,
    /// uuid of the assistant record that carried this call.
    pub invoking_record_id: String,
    pub timestamp: String,
}

impl ToolInvocation {
    /// The Bash command, when there is a non-empty one.
    pub fn shell_command(&self) -> Option<&str> {
        self.command.as_deref().filter(|c| !c.is_empty())
    }
}

/// One observed outcome for a prior tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    /// uuid of the assistant record this result answers.
    pub source_invocation_ref: String,
    /// `tool_use_id` of the answering `tool_result` block, when present.
    pub tool_use_id: Option<String>,
    pub payload: ResultPayload,
    pub timestamp: String,
}

/// Tagged system records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SystemNotice {
    StopHookSummary {
        timestamp: String,
        hook_count: u64,
        error_count: usize,
        hook_commands: Vec<String>,
        prevented_continuation: bool,
    },
    TurnDuration {
        timestamp: String,
        duration_ms: u64,
    },
    ApiError {
        timestamp: String,
        message: String,
    },
}

impl SystemNotice {
    pub fn timestamp(&self) -> &str {
        match self {
            Self::StopHookSummary { timestamp, .. }
            | Self::TurnDuration { timestamp, .. }
            | Self::ApiError { timestamp, .. } => timestamp,
        }
    }
}

/// Every event kind the normalizer produces, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    ToolCall(ToolInvocation),
    ToolResult(ToolResult),
    AssistantText { text: String, timestamp: String },
    UserMessage { text: String, timestamp: String },
    Notice(SystemNotice),
}

impl SessionEvent {
    pub fn timestamp(&self) -> &str {
        match self {
            Self::ToolCall(call) => &call.timestamp,
            Self::ToolResult(result) => &result.timestamp,
            Self::AssistantText { timestamp, .. } | Self::UserMessage { timestamp, .. } => {
                timestamp
            }
            Self::Notice(notice) => notice.timestamp(),
        }
    }
}
