//! Configuration loading and management.

use std::path::{Path, PathBuf};

use cts_core::ProjectNamer;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Directory holding one subdirectory of JSONL logs per project.
    pub projects_dir: PathBuf,

    /// Home directory; projects under it are shown as `~/...`.
    pub home_dir: PathBuf,

    /// Code root; projects under it are shown relative to it.
    pub code_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let home_dir = dirs::home_dir().unwrap_or_default();
        Self {
            database_path: data_dir.join("claude_messages.db"),
            projects_dir: home_dir.join(".claude").join("projects"),
            code_dir: home_dir.join("Code"),
            home_dir,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CCTIMESHEET_*)
        figment = figment.merge(Env::prefixed("CCTIMESHEET_"));

        figment.extract()
    }

    /// Builds the display-name transform for the configured directories.
    pub fn project_namer(&self) -> ProjectNamer {
        ProjectNamer::new(&self.home_dir, &self.code_dir)
    }
}

/// Returns the platform-specific config directory for cctimesheet.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cctimesheet"))
}

/// Returns the platform-specific data directory for cctimesheet.
///
/// On Linux: `~/.local/share/cctimesheet`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("cctimesheet"))
}
