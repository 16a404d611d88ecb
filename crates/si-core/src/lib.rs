//! Event reconstruction and classification for coding assistant session logs.
//!
//! This crate contains the analysis engine behind `si`:
//! - Decoding: JSONL session files into loosely-typed records
//! - Normalization: records into tool calls, tool results and system notices
//! - Classification and correlation: attaching an outcome to every tool call
//! - Aggregation: permission, frequency, timeline, failure and summary reports
//!
//! Discovery of session files and all rendering live in `si-cli`.

pub mod aggregate;
mod analyze;
pub mod classify;
pub mod correlate;
pub mod decode;
mod error;
pub mod event;
pub mod normalize;
pub mod record;
pub mod shell;
mod text;

pub use analyze::{Corpus, LogSource, SessionAnalysis, analyze_source, analyze_sources};
pub use classify::{OutcomeClass, classify};
pub use correlate::{Correlation, ResolvedInvocation, correlate};
pub use decode::{Decoded, decode_reader, read_source};
pub use error::{InspectError, SourceError};
pub use event::{ResultPayload, SessionEvent, SystemNotice, ToolInvocation, ToolResult};
pub use normalize::{NormalizedSession, RecordStats, normalize};
