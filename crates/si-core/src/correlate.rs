//! Matching tool results to the calls that produced them.
//!
//! Correlation is a pure pass: it takes the immutable invocation and result
//! lists of one session and builds a new list of resolved invocations.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::classify::{OutcomeClass, classify};
use crate::event::{ResultPayload, ToolInvocation, ToolResult};

/// A tool call together with the outcome attached to it, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedInvocation {
    #[serde(flatten)]
    pub invocation: ToolInvocation,
    pub outcome: OutcomeClass,
    pub result: Option<ResultPayload>,
    /// Position of the bound result in the session's result list.
    #[serde(skip)]
    pub result_index: Option<usize>,
}

impl ResolvedInvocation {
    fn pending(invocation: &ToolInvocation) -> Self {
        Self {
            invocation: invocation.clone(),
            outcome: OutcomeClass::Pending,
            result: None,
            result_index: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.result_index.is_none()
    }
}

/// Output of [`correlate`].
#[derive(Debug, Clone, Default)]
pub struct Correlation {
    /// One entry per invocation, in invocation order.
    pub resolved: Vec<ResolvedInvocation>,
    /// Results that found no pending invocation to bind to.
    pub unmatched_results: usize,
}

/// Bind each result to at most one pending invocation.
///
/// Results are taken in source order. A result binds to the earliest
/// still-pending invocation whose record id equals its back-reference; when
/// the result names a `tool_use_id` that one of those candidates carries,
/// that candidate is taken instead. Once bound, an invocation is never
/// rebound.
pub fn correlate<'a, I, R>(invocations: I, results: R) -> Correlation
where
    I: IntoIterator<Item = &'a ToolInvocation>,
    R: IntoIterator<Item = &'a ToolResult>,
{
    let calls: Vec<&ToolInvocation> = invocations.into_iter().collect();

    // Pending invocation indices per invoking record, in source order.
    let mut pending: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (index, call) in calls.iter().enumerate() {
        if !call.invoking_record_id.is_empty() {
            pending
                .entry(call.invoking_record_id.as_str())
                .or_default()
                .push_back(index);
        }
    }

    let mut resolved: Vec<ResolvedInvocation> = calls
        .iter()
        .map(|call| ResolvedInvocation::pending(call))
        .collect();
    let mut unmatched_results = 0;

    for (result_index, result) in results.into_iter().enumerate() {
        let candidates = pending
            .get_mut(result.source_invocation_ref.as_str())
            .filter(|c| !c.is_empty());
        let Some(candidates) = candidates else {
            unmatched_results += 1;
            continue;
        };

        let by_tool_use_id = result.tool_use_id.as_deref().and_then(|id| {
            candidates
                .iter()
                .position(|&i| calls[i].tool_use_id.as_deref() == Some(id))
        });
        let Some(index) = candidates.remove(by_tool_use_id.unwrap_or(0)) else {
            continue;
        };

        let entry = &mut resolved[index];
        entry.outcome = classify(Some(&result.payload));
        entry.result = Some(result.payload.clone());
        entry.result_index = Some(result_index);
    }

    if unmatched_results > 0 {
        tracing::debug!(unmatched_results, "tool results without a pending invocation");
    }

    Correlation {
        resolved,
        unmatched_results,
    }
}
