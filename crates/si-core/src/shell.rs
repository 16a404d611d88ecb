//! Shell command keys for aggregation.

use crate::event::ToolInvocation;
use crate::text;

/// Name of the program a command line starts with.
///
/// The line is cut at the first unquoted `&`, `|` or `;`; the first
/// whitespace-delimited token of what remains is reduced to its final path
/// component. `/usr/bin/git status && make` resolves to `git`.
pub fn command_name(command: &str) -> &str {
    let first_segment = first_segment(command);
    let token = first_segment.split_whitespace().next().unwrap_or("");
    text::basename(token)
}

/// Text before the first separator that is not inside quotes.
fn first_segment(command: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in command.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('"') | None, '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(c),
            (None, '&' | '|' | ';') => return &command[..i],
            _ => {}
        }
    }
    command
}

/// Grouping key: `Bash:<program>` for shell calls with a command, else the tool name.
pub fn aggregation_key(call: &ToolInvocation) -> String {
    match (call.tool_name.as_str(), call.shell_command()) {
        ("Bash", Some(command)) => format!("Bash:{}", command_name(command)),
        (tool, _) => tool.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_name_basic() {
        assert_eq!(command_name("git status"), "git");
        assert_eq!(command_name("/usr/bin/git status"), "git");
        assert_eq!(command_name("  cargo   test"), "cargo");
    }

    #[test]
    fn test_command_name_separators() {
        assert_eq!(command_name("cd /repo && make"), "cd");
        assert_eq!(command_name("cat file | grep x"), "cat");
        assert_eq!(command_name("true; false"), "true");
        assert_eq!(command_name("sleep 1 &"), "sleep");
    }

    #[test]
    fn test_command_name_leading_separator_is_empty() {
        assert_eq!(command_name("| grep x"), "");
        assert_eq!(command_name(";ls"), "");
    }

    #[test]
    fn test_command_name_ignores_quoted_separators() {
        assert_eq!(command_name(r#"echo "a;b" | wc"#), "echo");
        assert_eq!(command_name("git commit -m 'fix; again' && ls"), "git");
        assert_eq!(command_name(r"printf a\;b; ls"), "printf");
    }

    #[test]
    fn test_command_name_empty() {
        assert_eq!(command_name(""), "");
        assert_eq!(command_name("   "), "");
    }

    fn call(tool: &str, command: Option<&str>) -> ToolInvocation {
        ToolInvocation {
            tool_name: tool.to_string(),
            tool_use_id: None,
            input: json!({}),
            command: command.map(String::from),
            invoking_record_id: "a".to_string(),
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_aggregation_key() {
        assert_eq!(aggregation_key(&call("Bash", Some("rm -rf /tmp/x"))), "Bash:rm");
        assert_eq!(aggregation_key(&call("Bash", Some(""))), "Bash");
        assert_eq!(aggregation_key(&call("Read", None)), "Read");
    }
}
