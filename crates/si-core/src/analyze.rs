//! Per-source analysis pipeline.
//!
//! Each source is decoded, normalized and correlated on its own; sources are
//! processed in parallel and merged only when aggregating.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::correlate::{ResolvedInvocation, correlate};
use crate::decode::{self, Decoded};
use crate::error::{InspectError, SourceError};
use crate::normalize::{NormalizedSession, normalize};

/// One session log selected for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub path: PathBuf,
    /// Human-readable project label.
    pub project: String,
    /// Session identifier, usually the file stem.
    pub session_id: String,
}

impl LogSource {
    pub fn new(path: impl Into<PathBuf>, project: impl Into<String>) -> Self {
        let path = path.into();
        let session_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        Self {
            path,
            project: project.into(),
            session_id,
        }
    }
}

/// Everything derived from one source.
#[derive(Debug, Clone)]
pub struct SessionAnalysis {
    pub source: LogSource,
    pub session: NormalizedSession,
    /// One entry per tool call, in source order.
    pub invocations: Vec<ResolvedInvocation>,
    pub malformed_lines: usize,
    pub unmatched_results: usize,
}

impl SessionAnalysis {
    /// Normalize and correlate already-decoded records.
    pub fn from_decoded(source: LogSource, decoded: &Decoded) -> Self {
        let session = normalize(&decoded.records);
        let correlation = correlate(session.invocations(), session.results());

        Self {
            source,
            session,
            invocations: correlation.resolved,
            malformed_lines: decoded.malformed_lines,
            unmatched_results: correlation.unmatched_results,
        }
    }
}

/// Successfully analysed sessions plus the sources that could not be read.
#[derive(Debug, Default)]
pub struct Corpus {
    /// In the order the sources were given.
    pub sessions: Vec<SessionAnalysis>,
    pub unreadable: Vec<SourceError>,
}

/// Decode, normalize and correlate one source.
pub fn analyze_source(source: &LogSource) -> Result<SessionAnalysis, SourceError> {
    let decoded = decode::read_source(&source.path)?;
    Ok(SessionAnalysis::from_decoded(source.clone(), &decoded))
}

/// Analyse every source in parallel.
///
/// An unreadable source is logged and reported in [`Corpus::unreadable`]
/// without affecting the others.
pub fn analyze_sources(sources: &[LogSource]) -> Result<Corpus, InspectError> {
    if sources.is_empty() {
        return Err(InspectError::EmptyResultSet);
    }

    let outcomes: Vec<Result<SessionAnalysis, SourceError>> =
        sources.par_iter().map(analyze_source).collect();

    let mut corpus = Corpus::default();
    for outcome in outcomes {
        match outcome {
            Ok(analysis) => corpus.sessions.push(analysis),
            Err(e) => {
                tracing::warn!(path = ?e.path(), error = %e, "skipping unreadable session");
                corpus.unreadable.push(e);
            }
        }
    }

    tracing::debug!(
        sessions = corpus.sessions.len(),
        unreadable = corpus.unreadable.len(),
        "analysed sources"
    );
    Ok(corpus)
}
