//! Session inspector CLI library.
//!
//! This crate provides session discovery, configuration and the text/JSON
//! rendering behind the `si` binary.

mod cli;
pub mod commands;
mod config;
pub mod discover;

pub use cli::{Cli, Commands, SelectArgs};
pub use config::Config;
