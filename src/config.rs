//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.folio.toml` files.

use crate::cli::{Args, Command};
use crate::render::Typography;
use crate::viewport::ScrollMotion;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".folio.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote account settings.
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Spacing and measure.
    #[serde(default)]
    pub typography: Typography,
}

/// Which account to show and how to reach the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// GitHub login of the account.
    #[serde(default = "default_handle")]
    pub handle: String,

    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repositories requested in the single page fetched.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Repository sort key.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Repository type filter.
    #[serde(default = "default_repo_type")]
    pub repo_type: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header; GitHub rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Address shown when the fetch fails.
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            handle: default_handle(),
            api_url: default_api_url(),
            per_page: default_per_page(),
            sort: default_sort(),
            repo_type: default_repo_type(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            contact_email: default_contact_email(),
        }
    }
}

fn default_handle() -> String {
    "trblackw".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_sort() -> String {
    "created".to_string()
}

fn default_repo_type() -> String {
    "owner".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("folio/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_contact_email() -> String {
    "tuckerblackwell.dev@gmail.com".to_string()
}

/// Terminal display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Glyph repeated in reading-time buckets.
    #[serde(default = "default_reading_glyph")]
    pub reading_glyph: String,

    /// Frames in a smooth scroll.
    #[serde(default = "default_scroll_steps")]
    pub scroll_steps: u32,

    /// Milliseconds between scroll frames.
    #[serde(default = "default_scroll_step_ms")]
    pub scroll_step_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            reading_glyph: default_reading_glyph(),
            scroll_steps: default_scroll_steps(),
            scroll_step_ms: default_scroll_step_ms(),
        }
    }
}

fn default_reading_glyph() -> String {
    crate::format::DEFAULT_GLYPH.to_string()
}

fn default_scroll_steps() -> u32 {
    12
}

fn default_scroll_step_ms() -> u64 {
    16
}

impl DisplayConfig {
    pub fn scroll_motion(&self) -> ScrollMotion {
        ScrollMotion {
            steps: self.scroll_steps,
            frame: Duration::from_millis(self.scroll_step_ms.max(1)),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the working directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.folio.toml` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line (or through their
    /// environment variables) override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(Command::Activity(activity)) = &args.command {
            if let Some(ref user) = activity.user {
                self.profile.handle = user.trim().to_string();
            }
            if let Some(ref api_url) = activity.api_url {
                self.profile.api_url = api_url.clone();
            }
            if let Some(per_page) = activity.per_page {
                self.profile.per_page = per_page;
            }
            if let Some(timeout) = activity.timeout {
                self.profile.timeout_seconds = timeout;
            }
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
