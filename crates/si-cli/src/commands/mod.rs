//! CLI subcommand implementations.
//!
//! Each command builds its report from `si-core` and renders it either as a
//! fixed-width text table or as pretty-printed JSON.

pub mod errors;
pub mod permissions;
pub mod summary;
pub mod timeline;
pub mod tools;
pub mod util;
