//! Session file discovery.
//!
//! Session logs live at `<projects>/<project-dir>/<session-id>.jsonl`, where
//! the project directory name is the encoded working directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

use si_core::LogSource;

/// Criteria for choosing which session files to analyse.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Case-insensitive substring of the project directory name.
    pub project: Option<String>,
    /// Prefix of the session id.
    pub session: Option<String>,
    /// Keep only the newest match.
    pub current: bool,
    /// Keep only the N newest matches.
    pub recent: Option<usize>,
    pub skip_subagents: bool,
}

/// One session file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub modified: SystemTime,
    pub path: PathBuf,
    /// Encoded project directory name.
    pub project_dir: String,
}

impl Candidate {
    pub fn project(&self) -> String {
        decode_project_name(&self.project_dir)
    }

    pub fn log_source(&self) -> LogSource {
        LogSource::new(self.path.clone(), self.project())
    }
}

/// Find session files under `base` matching `selection`, newest first.
pub fn find_sessions(base: &Path, selection: &Selection) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    let project_filter = selection.project.as_deref().map(str::to_lowercase);

    let entries =
        std::fs::read_dir(base).with_context(|| format!("failed to read {}", base.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", base.display()))?;
        let project_path = entry.path();
        if !project_path.is_dir() {
            continue;
        }
        let project_dir = entry.file_name().to_string_lossy().into_owned();
        if project_filter
            .as_deref()
            .is_some_and(|filter| !project_dir.to_lowercase().contains(filter))
        {
            continue;
        }

        let files = match std::fs::read_dir(&project_path) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(path = ?project_path, error = %e, "skipping unreadable project directory");
                continue;
            }
        };

        for file in files.filter_map(std::result::Result::ok) {
            let path = file.path();
            if !is_session_file(&path, selection) {
                continue;
            }
            let modified = match file.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "skipping session without mtime");
                    continue;
                }
            };
            candidates.push(Candidate {
                modified,
                path,
                project_dir: project_dir.clone(),
            });
        }
    }

    tracing::debug!(found = candidates.len(), base = ?base, "discovered session files");
    Ok(select(candidates, selection))
}

fn is_session_file(path: &Path, selection: &Selection) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some("jsonl") || !path.is_file() {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if selection.skip_subagents && name.contains("subagent") {
        return false;
    }
    match &selection.session {
        Some(prefix) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.starts_with(prefix.as_str())),
        None => true,
    }
}

/// Order candidates newest first and apply `--current` / `--recent`.
pub fn select(mut candidates: Vec<Candidate>, selection: &Selection) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.path.cmp(&a.path))
    });

    if selection.current {
        candidates.truncate(1);
    } else if let Some(n) = selection.recent {
        candidates.truncate(n);
    }
    candidates
}

/// Human-readable project name from an encoded directory name.
///
/// `d--dev-Projects-fleet-plugins` becomes `fleet-plugins`: everything after
/// the first `Projects` segment. Names without one are returned unchanged.
pub fn decode_project_name(encoded: &str) -> String {
    let parts: Vec<&str> = encoded.split('-').collect();
    match parts.iter().position(|p| *p == "Projects") {
        Some(i) => parts[i + 1..].join("-"),
        None => encoded.to_string(),
    }
}
