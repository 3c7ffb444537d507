//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Where `nt` keeps its events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// `SQLite` file holding the event table. Created on first use.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("nt.db"),
        }
    }
}

impl Config {
    /// Resolves the configuration for one invocation.
    ///
    /// Each layer overrides the previous one: built-in defaults,
    /// `<config dir>/nt/config.toml`, the `--config` file, then `NT_*`
    /// variables (`NT_DATABASE_PATH`). Missing files are skipped.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let user_file = dirs_config_path().map(|dir| dir.join("config.toml"));
        let files = user_file.iter().map(PathBuf::as_path).chain(config_path);

        files
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, file| figment.merge(Toml::file(file)),
            )
            .merge(Env::prefixed("NT_"))
            .extract()
    }
}

/// Returns the platform-specific config directory for nt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("nt"))
}

/// Returns the platform-specific data directory for nt.
///
/// On Linux: `~/.local/share/nt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("nt"))
}
