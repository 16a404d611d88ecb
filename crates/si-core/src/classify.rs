//! Outcome classification of tool results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::event::ResultPayload;

/// Marker the dcg policy engine writes into a denied tool call's result.
pub const DCG_BLOCK_PATTERN: &str = "BLOCKED by dcg";

/// Substrings written when the user declines a permission prompt.
pub const USER_REJECTION_PATTERNS: &[&str] = &[
    "User rejected tool use",
    "The user doesn't want to proceed",
];

/// Prefixes of known tool failures that are not permission related.
pub const TOOL_ERROR_PREFIXES: &[&str] = &[
    "Error: Exit code",
    "Error: File does not exist",
    "Error: File has not been read",
    "Error: String to replace not found",
    "Error: Request failed",
    "Error: File content",
    "Sibling tool call errored",
];

const GENERIC_ERROR_PREFIX: &str = "Error:";

/// Outcome of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Pending,
    Success,
    UserRejected,
    DcgBlocked,
    Error,
}

impl OutcomeClass {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Success,
        Self::UserRejected,
        Self::DcgBlocked,
        Self::Error,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::UserRejected => "user_rejected",
            Self::DcgBlocked => "dcg_blocked",
            Self::Error => "error",
        }
    }

    /// Rejections, blocks and errors.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::UserRejected | Self::DcgBlocked | Self::Error)
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomeClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| format!("invalid outcome class: {s}"))
    }
}

/// Classify a tool result payload.
///
/// Only text payloads are ever pattern matched. Structured payloads are tool
/// output (file contents, command stdout) and are always a success, even
/// when that output happens to contain a block or rejection marker.
///
/// Precedence among text rules: dcg block, then user rejection, then known
/// error prefixes, then any `Error:` prefix.
pub fn classify(payload: Option<&ResultPayload>) -> OutcomeClass {
    let text = match payload {
        None => return OutcomeClass::Pending,
        Some(ResultPayload::Structured(_) | ResultPayload::Other(_)) => {
            return OutcomeClass::Success;
        }
        Some(ResultPayload::Text(text)) => text,
    };

    if text.contains(DCG_BLOCK_PATTERN) {
        return OutcomeClass::DcgBlocked;
    }
    if USER_REJECTION_PATTERNS.iter().any(|p| text.contains(p)) {
        return OutcomeClass::UserRejected;
    }
    if TOOL_ERROR_PREFIXES.iter().any(|p| text.starts_with(p)) {
        return OutcomeClass::Error;
    }
    if text.starts_with(GENERIC_ERROR_PREFIX) {
        return OutcomeClass::Error;
    }
    OutcomeClass::Success
}
