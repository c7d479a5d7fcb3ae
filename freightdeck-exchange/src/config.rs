//! TOML configuration shared by the TUI and CLI.
//!
//! Lives at `<config dir>/freightdeck/config.toml` by default. Missing
//! file means defaults; a malformed file is an error, not a silent reset.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the schedule REST API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSection {
    /// Default directory for exported files.
    pub out_dir: PathBuf,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("exports"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection::default(),
            export: ExportSection::default(),
        }
    }
}

impl Config {
    /// Default location under the user config dir.
    pub fn default_path() -> PathBuf {
        dirs_config_dir().join("freightdeck").join("config.toml")
    }

    /// Default session token location, next to the config file.
    pub fn default_session_path() -> PathBuf {
        dirs_config_dir().join("freightdeck").join("session.json")
    }

    /// Load from a path. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("malformed config file: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read config: {}", path.display())),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("cannot write config: {}", path.display()))
    }
}

fn dirs_config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
}
