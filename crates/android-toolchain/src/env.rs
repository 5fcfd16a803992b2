//! Environment Manager
//!
//! Registers tool directories on the executable search path, both for this
//! process and, on CI runners that support it, for later steps of the job.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{info, debug};

use android_sdk_setup_core::{Result, SetupError};

use crate::host::HostPlatform;

/// Variable naming the file whose lines are added to PATH for later job steps
pub const CI_PATH_FILE_VAR: &str = "GITHUB_PATH";

/// Environment Manager
#[derive(Debug, Clone)]
pub struct EnvManager {
    separator: char,
    /// File that persists PATH additions across job steps
    path_file: Option<PathBuf>,
}

impl EnvManager {
    /// Create an environment manager
    pub fn new(host: HostPlatform, path_file: Option<PathBuf>) -> Self {
        Self {
            separator: host.path_separator(),
            path_file,
        }
    }

    /// Create an environment manager for the running process
    pub fn from_process(host: HostPlatform) -> Self {
        let path_file = std::env::var_os(CI_PATH_FILE_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(host, path_file)
    }

    /// PATH value with `additions` placed in front of `existing`
    pub fn prepend_paths(&self, existing: &str, additions: &[PathBuf]) -> String {
        let sep = self.separator.to_string();
        let mut entries: Vec<String> = additions
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        let rest: Vec<String> = existing
            .split(self.separator)
            .filter(|e| !e.is_empty() && !entries.iter().any(|a| a.as_str() == *e))
            .map(str::to_string)
            .collect();
        entries.extend(rest);

        entries.join(&sep)
    }

    /// Add `paths` to PATH for this process and, if configured, the job
    pub async fn add_to_path(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let current = std::env::var_os("PATH").unwrap_or_else(OsString::new);
        let updated = self.prepend_paths(&current.to_string_lossy(), paths);
        std::env::set_var("PATH", &updated);
        debug!("PATH is now {}", updated);

        if let Some(ref file) = self.path_file {
            Self::append_path_file(file, paths).await?;
            info!("Persisted PATH additions to {:?}", file);
        }

        Ok(())
    }

    /// Append one directory per line to a CI path file
    pub async fn append_path_file(file: &Path, paths: &[PathBuf]) -> Result<()> {
        let mut content = String::new();
        for path in paths {
            content.push_str(&path.to_string_lossy());
            content.push('\n');
        }

        let mut handle = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .await
            .map_err(|e| SetupError::filesystem(file, e))?;
        handle
            .write_all(content.as_bytes())
            .await
            .map_err(|e| SetupError::filesystem(file, e))?;
        handle.flush().await.map_err(|e| SetupError::filesystem(file, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_paths_keeps_order() {
        let env = EnvManager::new(HostPlatform::Linux, None);
        let additions = vec![
            PathBuf::from("/sdk/cmdline-tools/tools"),
            PathBuf::from("/sdk/cmdline-tools/tools/bin"),
            PathBuf::from("/sdk/platform-tools"),
        ];

        assert_eq!(
            env.prepend_paths("/usr/bin:/sdk/platform-tools:/bin", &additions),
            "/sdk/cmdline-tools/tools:/sdk/cmdline-tools/tools/bin:/sdk/platform-tools:/usr/bin:/bin"
        );
        assert_eq!(env.prepend_paths("", &additions[..1]), "/sdk/cmdline-tools/tools");
    }

    #[test]
    fn test_windows_separator() {
        let env = EnvManager::new(HostPlatform::Windows, None);
        assert_eq!(
            env.prepend_paths("C:\\Windows", &[PathBuf::from("D:\\sdk\\platform-tools")]),
            "D:\\sdk\\platform-tools;C:\\Windows"
        );
    }

    #[tokio::test]
    async fn test_append_path_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("github_path");
        std::fs::write(&file, "/already/there\n").unwrap();

        EnvManager::append_path_file(&file, &[PathBuf::from("/a"), PathBuf::from("/b")])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "/already/there\n/a\n/b\n");
    }
}
