//! Tools command: how often each tool was called.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use si_core::SessionAnalysis;
use si_core::aggregate::{ToolFrequencyReport, frequency};

pub fn format_tools(report: &ToolFrequencyReport) -> String {
    let mut output = String::new();
    let rule = "-".repeat(57);

    writeln!(output, "Sessions analyzed: {}", report.sessions).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "{:<40} {:>8} {:>7}", "Tool", "Count", "%").unwrap();
    writeln!(output, "{rule}").unwrap();
    for tool in &report.counts {
        writeln!(
            output,
            "{:<40} {:>8} {:>6.1}%",
            tool.tool,
            tool.count,
            tool.percent_of(report.total)
        )
        .unwrap();
    }
    writeln!(output, "{rule}").unwrap();
    writeln!(output, "{:<40} {:>8}", "TOTAL", report.total).unwrap();

    output
}

pub fn format_tools_json(report: &ToolFrequencyReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Runs the tools command.
pub fn run<W: Write>(writer: &mut W, sessions: &[SessionAnalysis], json: bool) -> Result<()> {
    let report = frequency::build(sessions);

    if json {
        writeln!(writer, "{}", format_tools_json(&report)?)?;
    } else {
        write!(writer, "{}", format_tools(&report))?;
    }
    Ok(())
}
