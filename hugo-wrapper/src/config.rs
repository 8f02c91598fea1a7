use hugo_resolver::github::{DEFAULT_OWNER, DEFAULT_REPO, MAX_PER_PAGE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Args;
use crate::error::{Result, WrapperError};
use crate::retry::RetryConfig;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DefaultConfig {
    #[serde(default = "default_install_dir")]
    pub install_dir: String,

    #[serde(default = "default_hugo_version")]
    pub hugo_version: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            hugo_version: default_hugo_version(),
            max_retries: default_max_retries(),
            timeout: default_timeout(),
        }
    }
}

/// The single repository Hugo releases are fetched from.
#[derive(Debug, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_repo")]
    pub repo: String,

    #[serde(default = "default_per_page")]
    pub per_page: u8,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            per_page: default_per_page(),
        }
    }
}

fn default_install_dir() -> String {
    "~/.hugo-wrapper".to_string()
}

fn default_hugo_version() -> String {
    "latest".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout() -> u64 {
    30
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

fn default_repo() -> String {
    DEFAULT_REPO.to_string()
}

fn default_per_page() -> u8 {
    MAX_PER_PAGE
}

/// Effective settings after applying command line overrides to the configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub hugo_version: String,
    pub install_dir: PathBuf,
    pub skip_checksum: bool,
    pub retry: RetryConfig,
    pub timeout: Duration,
    pub owner: String,
    pub repo: String,
    pub per_page: u8,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WrapperError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("hugo-wrapper.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/hugo-wrapper.toml"))
    }

    /// Merge configuration with command line arguments
    pub fn merge_with_args(&self, args: &Args) -> Settings {
        let retry = if args.no_retry {
            RetryConfig::disabled()
        } else {
            RetryConfig {
                max_retries: args.max_retries.unwrap_or(self.default.max_retries),
                ..Default::default()
            }
        };

        Settings {
            hugo_version: args
                .hugo_version
                .clone()
                .unwrap_or_else(|| self.default.hugo_version.clone()),
            install_dir: expand_home(
                args.install_dir
                    .as_deref()
                    .unwrap_or(&self.default.install_dir),
            ),
            skip_checksum: args.skip_checksum,
            retry,
            timeout: Duration::from_secs(self.default.timeout),
            owner: self.registry.owner.clone(),
            repo: self.registry.repo.clone(),
            per_page: self.registry.per_page,
        }
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path.starts_with('~') {
        if let Some(home) = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
        {
            let rest = path.strip_prefix('~').unwrap_or(path);
            let rest = rest.strip_prefix('/').unwrap_or(rest);
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
