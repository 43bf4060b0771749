//! Optional TOML configuration. Every field has a default, so the app runs
//! without a config file; the file only exists to point the seed load or the
//! exports somewhere else.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::seed::DEFAULT_SEED_URL;

/// File name of the configuration inside the config directory.
const FILE_NAME: &str = "config.toml";
/// Environment variable that overrides the configured seed URL.
pub const SEED_URL_ENV: &str = "PLAYER_ROSTER_SEED_URL";
/// Placeholder logo shown at the top of printed pages.
pub const DEFAULT_LOGO_URL: &str = "https://via.placeholder.com/150";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the initial roster is fetched from.
    pub seed_url: String,
    /// Directory PDFs are saved into. Falls back to the user's download
    /// directory, then the working directory.
    pub export_dir: Option<PathBuf>,
    /// Image shown at the top of printed pages.
    pub logo_url: String,
    /// Upper bound for the seed request.
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            export_dir: None,
            logo_url: DEFAULT_LOGO_URL.to_string(),
            http_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load the configuration from the standard location and apply the
    /// environment override.
    pub fn load() -> Result<Self> {
        let dirs = project_dirs()?;
        let mut config = Self::load_from(&dirs.config_dir().join(FILE_NAME));
        if let Ok(url) = env::var(SEED_URL_ENV) {
            if !url.trim().is_empty() {
                config.seed_url = url;
            }
        }
        Ok(config)
    }

    /// Read `path`, falling back to defaults when it is missing or cannot be
    /// parsed.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config")
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    /// Resolved PDF output directory.
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.export_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Directory for the log file, created on demand.
pub fn data_dir() -> Result<PathBuf> {
    let dir = project_dirs()?.data_dir().to_path_buf();
    fs::create_dir_all(&dir).context("failed to create data directory")?;
    Ok(dir)
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "player-roster")
        .ok_or_else(|| anyhow!("could not locate home directory"))
}
