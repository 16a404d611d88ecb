//! Failed tool calls: rejections, dcg blocks and errors.

use serde::Serialize;

use super::keep_last;
use super::permissions::call_excerpt;
use crate::analyze::SessionAnalysis;
use crate::classify::OutcomeClass;
use crate::event::ResultPayload;
use crate::shell::aggregation_key;
use crate::text;

const COMMAND_LENGTH: usize = 80;
const RESULT_DETAIL_LENGTH: usize = 120;
const SESSION_LABEL_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub timestamp: String,
    /// Aggregation key, e.g. `Bash:rm`.
    pub tool: String,
    pub class: OutcomeClass,
    pub command: String,
    pub detail: String,
    pub project: String,
    /// Shortened session id.
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// Oldest first.
    pub entries: Vec<FailureEntry>,
}

impl FailureReport {
    pub fn of_class(&self, class: OutcomeClass) -> impl Iterator<Item = &FailureEntry> {
        self.entries.iter().filter(move |e| e.class == class)
    }
}

/// Collect every call whose outcome is a failure, oldest first.
pub fn build(sessions: &[SessionAnalysis], last: Option<usize>) -> FailureReport {
    let mut entries: Vec<FailureEntry> = sessions
        .iter()
        .flat_map(|session| {
            session
                .invocations
                .iter()
                .filter(|call| call.outcome.is_failure())
                .map(move |call| {
                    let detail = match call.outcome {
                        OutcomeClass::UserRejected => call_excerpt(call),
                        _ => call
                            .result
                            .as_ref()
                            .and_then(ResultPayload::as_text)
                            .map(|t| text::excerpt(t, RESULT_DETAIL_LENGTH))
                            .unwrap_or_default(),
                    };
                    FailureEntry {
                        timestamp: call.invocation.timestamp.clone(),
                        tool: aggregation_key(&call.invocation),
                        class: call.outcome,
                        command: call
                            .invocation
                            .shell_command()
                            .map(|c| text::excerpt(c, COMMAND_LENGTH))
                            .unwrap_or_default(),
                        detail,
                        project: session.source.project.clone(),
                        source: text::excerpt(&session.source.session_id, SESSION_LABEL_LENGTH),
                    }
                })
        })
        .collect();

    entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    keep_last(&mut entries, last);

    FailureReport { entries }
}
