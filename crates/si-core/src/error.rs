use std::path::PathBuf;

use thiserror::Error;

/// Failure to read one log source. Never aborts processing of other sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Unreadable { path, .. } => path,
        }
    }
}

/// Caller-level failures of an analysis run.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("no sessions found matching criteria")]
    EmptyResultSet,
}
