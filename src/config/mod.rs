//! Configuration management for folio

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Profile mirrored when nothing else is configured
pub const DEFAULT_PROFILE_URL: &str = "https://www.behance.net/nadayasser28";

/// Snapshot file name inside the public directory
pub const SNAPSHOT_FILE: &str = "behance-cache.json";

/// Per-project directory root inside the public directory
pub const PROJECTS_DIR: &str = "projects";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Behance profile to mirror
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    /// Serve listings and details from the snapshot / local metadata only
    #[serde(default)]
    pub static_cache: bool,

    /// Directory holding the snapshot file and per-project folders
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Result cap for a profile scrape
    #[serde(default = "default_max_projects")]
    pub max_projects: usize,

    /// Pause between listing page fetches, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

fn default_profile_url() -> String {
    DEFAULT_PROFILE_URL.to_string()
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_max_projects() -> usize {
    50
}

fn default_page_delay_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_url: default_profile_url(),
            static_cache: false,
            public_dir: default_public_dir(),
            max_projects: default_max_projects(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

/// Overrides layered on top of the config file (CLI flag or env var)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub profile_url: Option<String>,
    pub static_cache: Option<bool>,
    pub public_dir: Option<PathBuf>,
}

impl Config {
    /// Get the default config file path (~/.folio/config.yaml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".folio").join("config.yaml"))
    }

    /// Load configuration from an explicit path or the default location.
    ///
    /// A missing file is not an error: every setting has a default.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(p),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Apply CLI/env overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.profile_url {
            self.profile_url = url;
        }
        if let Some(flag) = overrides.static_cache {
            self.static_cache = flag;
        }
        if let Some(dir) = overrides.public_dir {
            self.public_dir = dir;
        }
        self
    }

    /// Path of the durable snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.public_dir.join(SNAPSHOT_FILE)
    }

    /// Root of the per-project metadata folders
    pub fn projects_dir(&self) -> PathBuf {
        self.public_dir.join(PROJECTS_DIR)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}
