//! Permission outcomes grouped by tool or shell command.

use std::collections::HashMap;

use serde::Serialize;

use super::OutcomeCounts;
use crate::analyze::SessionAnalysis;
use crate::classify::OutcomeClass;
use crate::correlate::ResolvedInvocation;
use crate::shell::aggregation_key;
use crate::text;

/// Representative examples kept per group.
const MAX_EXAMPLES: usize = 3;

/// Characters kept from a command or input in an example.
const EXAMPLE_LENGTH: usize = 80;

/// Minimum calls before an always-successful group is suggested for auto-approval.
pub const AUTO_APPROVE_MIN_CALLS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub class: OutcomeClass,
    pub detail: String,
}

/// All resolved calls sharing one aggregation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGroup {
    pub key: String,
    pub total: usize,
    #[serde(flatten)]
    pub outcomes: OutcomeCounts,
    pub examples: Vec<Example>,
}

impl PermissionGroup {
    fn new(key: String) -> Self {
        Self {
            key,
            total: 0,
            outcomes: OutcomeCounts::default(),
            examples: Vec::new(),
        }
    }

    /// Fraction of calls that succeeded.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.outcomes.success as f64 / self.total as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionTotals {
    pub calls: usize,
    #[serde(flatten)]
    pub outcomes: OutcomeCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionReport {
    pub sessions: usize,
    /// Sorted by `total`, largest first.
    pub groups: Vec<PermissionGroup>,
    pub totals: PermissionTotals,
}

impl PermissionReport {
    /// Groups with at least one dcg block.
    pub fn blocked(&self) -> impl Iterator<Item = &PermissionGroup> {
        self.groups.iter().filter(|g| g.outcomes.dcg_blocked > 0)
    }

    /// Groups with at least one user rejection.
    pub fn rejected(&self) -> impl Iterator<Item = &PermissionGroup> {
        self.groups.iter().filter(|g| g.outcomes.user_rejected > 0)
    }

    /// Groups where every call succeeded, with enough calls to be meaningful.
    pub fn auto_approve_candidates(&self) -> impl Iterator<Item = &PermissionGroup> {
        self.groups
            .iter()
            .filter(|g| g.total >= AUTO_APPROVE_MIN_CALLS && g.outcomes.success == g.total)
    }
}

/// Group every call that has a recorded result by its aggregation key.
///
/// Calls still pending have no outcome to report and are left out.
pub fn build(sessions: &[SessionAnalysis]) -> PermissionReport {
    let mut groups: Vec<PermissionGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals = PermissionTotals::default();

    let resolved = sessions
        .iter()
        .flat_map(|s| &s.invocations)
        .filter(|call| !call.is_pending());

    for call in resolved {
        let key = aggregation_key(&call.invocation);
        let i = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(PermissionGroup::new(key));
            groups.len() - 1
        });
        let group = &mut groups[i];

        group.total += 1;
        group.outcomes.add(call.outcome);
        totals.calls += 1;
        totals.outcomes.add(call.outcome);

        if matches!(
            call.outcome,
            OutcomeClass::UserRejected | OutcomeClass::DcgBlocked
        ) && group.examples.len() < MAX_EXAMPLES
        {
            group.examples.push(Example {
                class: call.outcome,
                detail: call_excerpt(call),
            });
        }
    }

    groups.sort_by_key(|g| std::cmp::Reverse(g.total));

    PermissionReport {
        sessions: sessions.len(),
        groups,
        totals,
    }
}

/// Short text identifying what a call tried to do.
pub(crate) fn call_excerpt(call: &ResolvedInvocation) -> String {
    match call.invocation.shell_command() {
        Some(command) => text::excerpt(command, EXAMPLE_LENGTH),
        None => text::excerpt(&text::compact(&call.invocation.input), EXAMPLE_LENGTH),
    }
}
