//! End-to-end tests driving the `si` binary against a temporary projects tree.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn si_binary() -> String {
    env!("CARGO_BIN_EXE_si").to_string()
}

const SESSION: &[&str] = &[
    r#"{"type":"user","timestamp":"2026-01-29T10:00:00Z","message":{"content":"tidy up please"}}"#,
    r#"{"type":"assistant","uuid":"a1","timestamp":"2026-01-29T10:00:01Z","message":{"content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"rm -rf /tmp/x"}}]}}"#,
    r#"{"type":"user","uuid":"u1","timestamp":"2026-01-29T10:00:02Z","sourceToolAssistantUUID":"a1","toolUseResult":"User rejected tool use"}"#,
    r#"{"type":"assistant","uuid":"a2","timestamp":"2026-01-29T10:00:03Z","message":{"content":[{"type":"tool_use","id":"t2","name":"Bash","input":{"command":"git push --force"}}]}}"#,
    r#"{"type":"user","uuid":"u2","timestamp":"2026-01-29T10:00:04Z","sourceToolAssistantUUID":"a2","toolUseResult":"BLOCKED by dcg: force push"}"#,
    r#"{"type":"assistant","uuid":"a3","timestamp":"2026-01-29T10:00:05Z","message":{"content":[{"type":"tool_use","id":"t3","name":"Read","input":{"file_path":"/src/main.rs"}}]}}"#,
    r#"{"type":"user","uuid":"u3","timestamp":"2026-01-29T10:00:06Z","sourceToolAssistantUUID":"a3","toolUseResult":{"file":{"filePath":"/src/main.rs"}}}"#,
    "this line is not json",
    r#"{"type":"system","subtype":"turn_duration","timestamp":"2026-01-29T10:00:07Z","durationMs":7000}"#,
];

/// Create `<temp>/projects/<project>/<session>.jsonl` and return the projects dir.
fn write_session(temp: &Path, project: &str, session: &str, lines: &[&str]) -> std::path::PathBuf {
    let projects = temp.join("projects");
    let dir = projects.join(project);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{session}.jsonl")), lines.join("\n")).unwrap();
    projects
}

fn si(temp: &Path, args: &[&str]) -> Output {
    Command::new(si_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run si")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_permissions_report() {
    let temp = TempDir::new().unwrap();
    let projects = write_session(temp.path(), "d--dev-Projects-fleet", "sess-1", SESSION);

    let output = si(
        temp.path(),
        &["permissions", "--path", projects.to_str().unwrap(), "-c"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Total tool calls:  3"), "{text}");
    assert!(text.contains("--- DCG BLOCKED ---"));
    assert!(text.contains("  -> git push --force"));
    assert!(text.contains("--- USER REJECTED ---"));
    assert!(text.contains("Bash:rm"));
    assert!(stderr(&output).contains("[1 session(s) | fleet]"));
}

#[test]
fn test_permissions_json_is_valid() {
    let temp = TempDir::new().unwrap();
    let projects = write_session(temp.path(), "d--dev-Projects-fleet", "sess-1", SESSION);

    let output = si(
        temp.path(),
        &["permissions", "--json", "--path", projects.to_str().unwrap()],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["totals"]["calls"], 3);
    assert_eq!(value["totals"]["user_rejected"], 1);
    assert_eq!(value["totals"]["dcg_blocked"], 1);
}

#[test]
fn test_timeline_filter_and_last() {
    let temp = TempDir::new().unwrap();
    let projects = write_session(temp.path(), "fleet", "sess-1", SESSION);

    let output = si(
        temp.path(),
        &[
            "timeline",
            "--json",
            "-f",
            "BASH",
            "-n",
            "2",
            "--path",
            projects.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let kinds: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["tool_call", "tool_result:dcg_blocked"]);
}

#[test]
fn test_errors_and_summary() {
    let temp = TempDir::new().unwrap();
    let projects = write_session(temp.path(), "fleet", "sess-1", SESSION);
    let path = projects.to_str().unwrap();

    let errors = si(temp.path(), &["errors", "--path", path]);
    assert!(errors.status.success(), "stderr: {}", stderr(&errors));
    let text = stdout(&errors);
    assert!(text.starts_with("Errors/Rejections: 2"), "{text}");
    assert!(text.contains("--- USER REJECTED (1) ---"));

    let summary = si(temp.path(), &["summary", "--json", "--path", path]);
    assert!(summary.status.success(), "stderr: {}", stderr(&summary));
    let value: serde_json::Value = serde_json::from_str(&stdout(&summary)).unwrap();
    assert_eq!(value[0]["source"], "sess-1");
    assert_eq!(value[0]["counts"]["tool_calls"], 3);
    assert_eq!(value[0]["malformed_lines"], 1);
    assert_eq!(value[0]["turn_durations"][0], 7000);
}

#[test]
fn test_tools_across_sessions() {
    let temp = TempDir::new().unwrap();
    write_session(temp.path(), "fleet", "sess-1", SESSION);
    let projects = write_session(temp.path(), "other", "sess-2", SESSION);

    let output = si(temp.path(), &["tools", "--path", projects.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("Sessions analyzed: 2"), "{text}");
    assert!(text.contains("TOTAL                                           6"));
}

#[test]
fn test_subagent_logs_are_skipped() {
    let temp = TempDir::new().unwrap();
    let projects = write_session(temp.path(), "fleet", "agent-subagent-1", SESSION);

    let output = si(temp.path(), &["tools", "--path", projects.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no sessions found matching criteria"));
}

#[test]
fn test_no_matching_sessions_fails() {
    let temp = TempDir::new().unwrap();
    let projects = write_session(temp.path(), "fleet", "sess-1", SESSION);

    let output = si(
        temp.path(),
        &["summary", "-s", "nomatch", "--path", projects.to_str().unwrap()],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no sessions found matching criteria"));
}

#[test]
fn test_missing_path_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nowhere");

    let output = si(temp.path(), &["summary", "--path", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Path not found"));
}

#[test]
fn test_projects_dir_from_config_file() {
    let temp = TempDir::new().unwrap();
    let projects = write_session(temp.path(), "fleet", "sess-1", SESSION);
    let config = temp.path().join("si.toml");
    fs::write(
        &config,
        format!("projects_dir = {:?}\n", projects.to_str().unwrap()),
    )
    .unwrap();

    let output = si(
        temp.path(),
        &["tools", "--config", config.to_str().unwrap()],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("TOTAL                                           3"));
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = si(temp.path(), &[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}
