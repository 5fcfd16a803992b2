//! Recording fake of [`SdkHost`] for unit tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use android_sdk_setup_core::{Result, SetupError};

use crate::system::{CommandLine, ProcessOutcome, SdkHost};

/// One side effect requested by the provisioner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(String),
    Extract { archive: PathBuf, dest: PathBuf },
    Run(CommandLine),
    EnsureDir(PathBuf),
    Remove(PathBuf),
    Write { path: PathBuf, contents: String },
    RegisterPaths(Vec<PathBuf>),
}

#[derive(Default)]
struct State {
    paths: HashSet<PathBuf>,
    calls: Vec<Call>,
    failing_args: Vec<(String, i32, String)>,
    failing_urls: Vec<String>,
    failing_extracts: Vec<PathBuf>,
}

/// In-memory host; paths exist once created or written
#[derive(Default)]
pub struct FakeHost {
    state: Mutex<State>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_path(&self, path: impl Into<PathBuf>) {
        self.state().paths.insert(path.into());
    }

    pub fn has_path(&self, path: &Path) -> bool {
        self.state().paths.contains(path)
    }

    /// Any command with an argument containing `needle` exits with `code`
    pub fn fail_command_with_arg(&self, needle: &str, code: i32, stderr: &str) {
        self.state()
            .failing_args
            .push((needle.to_string(), code, stderr.to_string()));
    }

    pub fn fail_fetch(&self, url: &str) {
        self.state().failing_urls.push(url.to_string());
    }

    /// Extracting into `dest` fails after leaving a partial file behind
    pub fn fail_extract(&self, dest: impl Into<PathBuf>) {
        self.state().failing_extracts.push(dest.into());
    }

    /// Let every previously failing operation succeed again
    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.failing_args.clear();
        state.failing_urls.clear();
        state.failing_extracts.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Run(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Write { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Package lists of every `--install` invocation, in order
    pub fn installs(&self) -> Vec<Vec<String>> {
        self.commands()
            .into_iter()
            .filter(|cmd| cmd.args.first().map(String::as_str) == Some("--install"))
            .map(|cmd| cmd.args[1..].to_vec())
            .collect()
    }
}

#[async_trait]
impl SdkHost for FakeHost {
    async fn fetch_archive(&self, url: &str) -> Result<PathBuf> {
        let mut state = self.state();
        state.calls.push(Call::Fetch(url.to_string()));
        if state.failing_urls.iter().any(|u| u == url) {
            return Err(SetupError::Transfer(format!("HTTP 404 Not Found for {}", url)));
        }
        let name = url.rsplit('/').next().unwrap_or("archive.zip");
        Ok(PathBuf::from("/tmp/downloads").join(name))
    }

    async fn extract_archive(&self, archive: &Path, dest: &Path) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::Extract {
            archive: archive.to_path_buf(),
            dest: dest.to_path_buf(),
        });
        if state.failing_extracts.iter().any(|d| d == dest) {
            state.paths.insert(dest.join("partial"));
            return Err(SetupError::Extraction(format!("{:?}: invalid Zip archive", archive)));
        }
        state.paths.insert(dest.to_path_buf());
        Ok(())
    }

    async fn run_command(&self, cmd: &CommandLine) -> Result<ProcessOutcome> {
        let mut state = self.state();
        state.calls.push(Call::Run(cmd.clone()));
        let failure = state
            .failing_args
            .iter()
            .find(|(needle, _, _)| cmd.args.iter().any(|a| a.contains(needle.as_str())))
            .cloned();
        Ok(match failure {
            Some((_, code, stderr)) => ProcessOutcome { code: Some(code), stderr },
            None => ProcessOutcome::success(),
        })
    }

    async fn ensure_directory(&self, path: &Path) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::EnsureDir(path.to_path_buf()));
        state.paths.insert(path.to_path_buf());
        Ok(())
    }

    async fn remove_recursive(&self, path: &Path) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::Remove(path.to_path_buf()));
        state.paths.retain(|p| !p.starts_with(path));
        Ok(())
    }

    async fn path_exists(&self, path: &Path) -> bool {
        self.state().paths.contains(path)
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::Write {
            path: path.to_path_buf(),
            contents: contents.to_string(),
        });
        state.paths.insert(path.to_path_buf());
        Ok(())
    }

    async fn register_search_paths(&self, paths: &[PathBuf]) -> Result<()> {
        self.state().calls.push(Call::RegisterPaths(paths.to_vec()));
        Ok(())
    }
}
