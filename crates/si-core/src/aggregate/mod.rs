//! Read-only reports over analysed sessions.
//!
//! Every aggregator takes the analysed sessions by shared reference and
//! returns an owned, serializable report. Multi-session reports merge
//! entries in session order before a single stable sort, so ties resolve
//! by processing order.

pub mod failures;
pub mod frequency;
pub mod permissions;
pub mod summary;
pub mod timeline;

use std::collections::HashMap;

use serde::Serialize;

use crate::classify::OutcomeClass;

pub use failures::{FailureEntry, FailureReport};
pub use frequency::{ToolFrequency, ToolFrequencyReport};
pub use permissions::{Example, PermissionGroup, PermissionReport, PermissionTotals};
pub use summary::{SessionSummary, SummaryCounts, ToolCount};
pub use timeline::{TimelineEntry, TimelineOptions, TimelineReport};

/// Per-class tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    #[serde(skip_serializing_if = "is_zero")]
    pub pending: usize,
    pub success: usize,
    pub user_rejected: usize,
    pub dcg_blocked: usize,
    pub error: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes a reference
const fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl OutcomeCounts {
    pub const fn add(&mut self, class: OutcomeClass) {
        match class {
            OutcomeClass::Pending => self.pending += 1,
            OutcomeClass::Success => self.success += 1,
            OutcomeClass::UserRejected => self.user_rejected += 1,
            OutcomeClass::DcgBlocked => self.dcg_blocked += 1,
            OutcomeClass::Error => self.error += 1,
        }
    }

    pub const fn get(&self, class: OutcomeClass) -> usize {
        match class {
            OutcomeClass::Pending => self.pending,
            OutcomeClass::Success => self.success,
            OutcomeClass::UserRejected => self.user_rejected,
            OutcomeClass::DcgBlocked => self.dcg_blocked,
            OutcomeClass::Error => self.error,
        }
    }

    pub const fn total(&self) -> usize {
        self.pending + self.success + self.user_rejected + self.dcg_blocked + self.error
    }
}

/// Count occurrences of each key, most frequent first; ties keep first-seen order.
pub(crate) fn count_by<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for key in keys {
        let i = *index.entry(key).or_insert_with(|| {
            counts.push((key.to_string(), 0));
            counts.len() - 1
        });
        counts[i].1 += 1;
    }

    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    counts
}

/// Keep only the last `n` items when a limit is given.
pub(crate) fn keep_last<T>(items: &mut Vec<T>, last: Option<usize>) {
    if let Some(n) = last {
        if items.len() > n {
            items.drain(..items.len() - n);
        }
    }
}
