//! Setup Configuration
//!
//! Manages the knobs of a provisioning run:
//! - Pinned tool versions (build-tools, command-line tools build)
//! - Download repository and staging directory
//! - SDK root resolution from the environment

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use tracing::{info, debug};

use crate::error::{Result, SetupError};

/// Environment variables consulted for the SDK root, in priority order
pub const SDK_ROOT_ENV_VARS: &[&str] = &["ANDROID_HOME", "ANDROID_SDK_ROOT"];

/// Build-tools version installed alongside every platform
pub const DEFAULT_BUILD_TOOLS_VERSION: &str = "30.0.2";

/// Build id of the command-line tools archive
pub const DEFAULT_CMDLINE_TOOLS_BUILD: &str = "6609375";

/// Google's Android repository
pub const DEFAULT_REPOSITORY_URL: &str = "https://dl.google.com/android/repository";

/// Main setup configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SetupConfig {
    /// build-tools;<version> installed with the platform
    pub build_tools_version: String,
    /// Build id in commandlinetools-<host>-<build>_latest.zip
    pub cmdline_tools_build: String,
    /// Base URL archives are fetched from
    pub repository_url: String,
    /// Per-request download timeout in seconds
    pub download_timeout_secs: u64,
    /// Where archives are staged before extraction
    pub download_dir: Option<PathBuf>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            build_tools_version: DEFAULT_BUILD_TOOLS_VERSION.to_string(),
            cmdline_tools_build: DEFAULT_CMDLINE_TOOLS_BUILD.to_string(),
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            download_timeout_secs: 300,
            download_dir: None,
        }
    }
}

impl SetupConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "android-sdk-setup", "android-sdk-setup")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// read when present and defaults are used otherwise.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_file = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::config_file() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        info!("Loading configuration from {:?}", config_file);
        let contents = tokio::fs::read_to_string(&config_file).await.map_err(|e| {
            SetupError::Configuration(format!("cannot read {}: {}", config_file.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: SetupConfig = toml::from_str(contents)
            .map_err(|e| SetupError::Configuration(format!("invalid config: {}", e)))?;

        if config.build_tools_version.trim().is_empty() {
            return Err(SetupError::Configuration("build_tools_version is empty".into()));
        }
        if config.cmdline_tools_build.trim().is_empty() {
            return Err(SetupError::Configuration("cmdline_tools_build is empty".into()));
        }

        Ok(config)
    }

    /// Directory archives are downloaded into
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("android-sdk-setup"))
    }

    /// Repository URL without a trailing slash
    pub fn repository(&self) -> &str {
        self.repository_url.trim_end_matches('/')
    }
}

/// Resolve the SDK root from the process environment
pub fn resolve_sdk_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    resolve_sdk_root_with(explicit, |key| std::env::var(key).ok())
}

/// Resolve the SDK root using `lookup` for environment access
pub fn resolve_sdk_root_with<F>(explicit: Option<PathBuf>, lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }

    SDK_ROOT_ENV_VARS
        .iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .map(PathBuf::from)
        .ok_or_else(|| {
            SetupError::Configuration(format!(
                "SDK root is not set; export one of {}",
                SDK_ROOT_ENV_VARS.join(", ")
            ))
        })
}

/// Name of the user running the setup, used for ownership normalization
pub fn invoking_user() -> Result<String> {
    std::env::var("USER")
        .ok()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| SetupError::Configuration("USER is not set".into()))
}
