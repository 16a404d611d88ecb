//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one subdirectory of session logs per project.
    pub projects_dir: PathBuf,
    /// Ignore session files whose name contains `subagent`.
    pub skip_subagents: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
            skip_subagents: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources override earlier ones: defaults, the user config file,
    /// `config_path`, then `SI_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("SI_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for si.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("si"))
}

/// `~/.claude/projects`, where the assistant writes its session logs.
fn default_projects_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("projects")
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::NamedTempFile;

    #[test]
    fn test_dirs_config_path_ends_with_si() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "si");
    }

    #[test]
    fn test_default_projects_dir() {
        let config = Config::default();
        assert!(config.projects_dir.ends_with(".claude/projects"));
        assert!(config.skip_subagents);
    }

    #[test]
    fn test_explicit_config_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"projects_dir = \"/srv/logs\"\nskip_subagents = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.projects_dir, PathBuf::from("/srv/logs"));
        assert!(!config.skip_subagents);
    }

    #[test]
    fn test_partial_config_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"skip_subagents = false\n").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert!(!config.skip_subagents);
        assert!(config.projects_dir.ends_with("projects"));
    }
}
