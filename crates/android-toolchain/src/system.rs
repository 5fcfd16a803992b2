//! Host capabilities
//!
//! Everything the provisioner does to the outside world goes through
//! [`SdkHost`]: downloads, extraction, subprocesses, filesystem writes and
//! PATH registration. [`SystemHost`] is the real implementation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use android_sdk_setup_core::{Result, SetupConfig, SetupError};

use crate::downloader::ToolchainDownloader;
use crate::env::EnvManager;
use crate::host::HostPlatform;
use crate::sdk_manager::resolve_executable;

/// A program invocation, without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(';') || arg.contains(' ') {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How a finished subprocess exited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success() -> Self {
        Self { code: Some(0), stderr: String::new() }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into a subprocess error
    pub fn check(self, cmd: &CommandLine) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(SetupError::Subprocess {
            program: cmd.program.clone(),
            code: self.code,
            stderr: self.stderr,
        })
    }
}

/// Side-effecting operations the provisioner depends on
#[async_trait]
pub trait SdkHost: Send + Sync {
    /// Download `url` to a local file and return its path
    async fn fetch_archive(&self, url: &str) -> Result<PathBuf>;

    /// Unpack a zip archive into `dest`
    async fn extract_archive(&self, archive: &Path, dest: &Path) -> Result<()>;

    /// Run a program to completion. Only a failure to spawn is an `Err`;
    /// the exit status is reported in the outcome.
    async fn run_command(&self, cmd: &CommandLine) -> Result<ProcessOutcome>;

    /// Create `path` and all missing parents
    async fn ensure_directory(&self, path: &Path) -> Result<()>;

    /// Remove `path` recursively; a missing path is not an error
    async fn remove_recursive(&self, path: &Path) -> Result<()>;

    async fn path_exists(&self, path: &Path) -> bool;

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    /// Put `paths` in front of the executable search path, in order
    async fn register_search_paths(&self, paths: &[PathBuf]) -> Result<()>;
}

/// Real host: network, disk and processes
pub struct SystemHost {
    downloader: ToolchainDownloader,
    env: EnvManager,
    sdk_root: PathBuf,
}

impl SystemHost {
    pub fn new(config: &SetupConfig, host: HostPlatform, sdk_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            downloader: ToolchainDownloader::new(config)?,
            env: EnvManager::from_process(host),
            sdk_root: sdk_root.into(),
        })
    }
}

#[async_trait]
impl SdkHost for SystemHost {
    async fn fetch_archive(&self, url: &str) -> Result<PathBuf> {
        Ok(self.downloader.fetch(url).await?)
    }

    async fn extract_archive(&self, archive: &Path, dest: &Path) -> Result<()> {
        ToolchainDownloader::extract_zip(archive, dest).await?;

        if archive.starts_with(self.downloader.target_dir()) {
            tokio::fs::remove_file(archive)
                .await
                .map_err(|e| SetupError::filesystem(archive, e))?;
        }
        Ok(())
    }

    async fn run_command(&self, cmd: &CommandLine) -> Result<ProcessOutcome> {
        let program = resolve_executable(&cmd.program, &self.sdk_root);
        debug!("Running {} ({:?})", cmd, program);

        let output = Command::new(&program)
            .args(&cmd.args)
            .envs(cmd.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SetupError::Subprocess {
                program: cmd.program.clone(),
                code: None,
                stderr: format!("failed to start {:?}: {}", program, e),
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("{}: {}", cmd.program, line);
        }

        Ok(ProcessOutcome {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn ensure_directory(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| SetupError::filesystem(path, e))
    }

    async fn remove_recursive(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SetupError::filesystem(path, e)),
        }
    }

    async fn path_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| SetupError::filesystem(path, e))
    }

    async fn register_search_paths(&self, paths: &[PathBuf]) -> Result<()> {
        self.env.add_to_path(paths).await?;
        info!("Added {} directories to PATH", paths.len());
        Ok(())
    }
}
