//! Tool call frequency.

use std::collections::HashMap;

use serde::Serialize;

use super::count_by;
use crate::analyze::SessionAnalysis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFrequency {
    pub tool: String,
    pub count: usize,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolFrequencyReport {
    pub sessions: usize,
    /// Most used first.
    pub counts: Vec<ToolFrequency>,
    pub total: usize,
}

impl ToolFrequency {
    /// Share of all calls, in percent.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_of(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        100.0 * self.count as f64 / total as f64
    }
}

/// Count every tool call, resolved or not, by bare tool name.
pub fn build(sessions: &[SessionAnalysis]) -> ToolFrequencyReport {
    let calls = || {
        sessions
            .iter()
            .flat_map(|s| &s.invocations)
            .map(|c| &c.invocation)
    };

    let mut seen: HashMap<&str, (&str, &str)> = HashMap::new();
    for call in calls() {
        let ts = call.timestamp.as_str();
        if ts.is_empty() {
            continue;
        }
        let range = seen.entry(call.tool_name.as_str()).or_insert((ts, ts));
        if ts < range.0 {
            range.0 = ts;
        }
        if ts > range.1 {
            range.1 = ts;
        }
    }

    let counts: Vec<ToolFrequency> = count_by(calls().map(|c| c.tool_name.as_str()))
        .into_iter()
        .map(|(tool, count)| {
            let range = seen.get(tool.as_str());
            ToolFrequency {
                first_seen: range.map(|r| r.0.to_string()),
                last_seen: range.map(|r| r.1.to_string()),
                tool,
                count,
            }
        })
        .collect();

    ToolFrequencyReport {
        sessions: sessions.len(),
        total: counts.iter().map(|c| c.count).sum(),
        counts,
    }
}
