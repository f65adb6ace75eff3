use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::transport::http::DEFAULT_BASE_URL;

/// The session the CLI stays logged in with between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub username: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional backend base URL override.
    pub base_url: Option<String>,

    /// Example TOML:
    /// [session]
    /// token = "..."
    /// username = "..."
    pub session: Option<StoredSession>,
}

impl Config {
    /// Base URL the client talks to, falling back to the local server.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// The stored session, or an error telling the user how to get one.
    pub fn session(&self) -> Result<&StoredSession> {
        self.session.as_ref().ok_or_else(|| {
            anyhow!(
                "Not logged in.\n\
                 Hint: run `skylog login` first."
            )
        })
    }

    pub fn set_session(&mut self, token: String, username: String) {
        self.session = Some(StoredSession { token, username });
    }

    /// Forgets the locally stored session. The server keeps no revocation
    /// list, so the token itself stays valid until the backend restarts.
    /// Returns `false` when there was nothing to clear.
    pub fn clear_session(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skylog", "skylog-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
