//! Toolchain Downloader
//!
//! Downloads and extracts SDK archives (command-line tools, pinned emulator
//! builds).

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{info, debug, warn};

use android_sdk_setup_core::{SetupConfig, SetupError};

/// Download progress callback
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Download error types
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Extraction failed: {0}")]
    Extraction(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DownloadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        DownloadError::Io { path: path.to_path_buf(), source }
    }
}

impl From<DownloadError> for SetupError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Network(e) => SetupError::Transfer(e.to_string()),
            DownloadError::InvalidResponse(msg) => SetupError::Transfer(msg),
            DownloadError::Extraction(msg) => SetupError::Extraction(msg),
            DownloadError::Io { path, source } => SetupError::filesystem(path, source),
        }
    }
}

/// Toolchain downloader
pub struct ToolchainDownloader {
    client: Client,
    target_dir: PathBuf,
}

impl ToolchainDownloader {
    /// Create a new downloader
    pub fn new(config: &SetupConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .user_agent(concat!("android-sdk-setup/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            target_dir: config.download_dir(),
        })
    }

    /// Local file name for an archive URL
    pub fn archive_name(url: &str) -> String {
        url.split(['?', '#'])
            .next()
            .and_then(|u| u.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("download.zip")
            .to_string()
    }

    /// Download `url` into the target directory, drawing progress on stderr
    /// when it is a terminal.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let target = self.target_dir.join(Self::archive_name(url));
        let bar = progress_bar(&Self::archive_name(url));
        let tracker = bar.clone();
        let callback: ProgressCallback = Box::new(move |done, total| {
            if total > 0 && tracker.length() != Some(total) {
                tracker.set_length(total);
            }
            tracker.set_position(done);
        });
        let result = self.download_file(url, &target, Some(callback)).await;
        match result {
            Ok(()) => bar.finish_and_clear(),
            Err(_) => bar.abandon(),
        }
        result?;
        Ok(target)
    }

    /// Download a file with progress reporting
    pub async fn download_file(
        &self,
        url: &str,
        target: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<(), DownloadError> {
        info!("Downloading {} to {:?}", url, target);

        // Ensure parent directory exists
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::InvalidResponse(
                format!("HTTP {} for {}", response.status(), url)
            ));
        }

        let total_size = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;

        let mut file = tokio::fs::File::create(target)
            .await
            .map_err(|e| DownloadError::io(target, e))?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(target, e))?;
            downloaded += chunk.len() as u64;

            if let Some(ref callback) = progress {
                callback(downloaded, total_size);
            }
        }

        file.flush().await.map_err(|e| DownloadError::io(target, e))?;

        if total_size > 0 && downloaded != total_size {
            warn!("Expected {} bytes from {}, received {}", total_size, url, downloaded);
            return Err(DownloadError::InvalidResponse(format!(
                "truncated body: {} of {} bytes",
                downloaded, total_size
            )));
        }

        info!("Download complete: {:?} ({} bytes)", target, downloaded);
        Ok(())
    }

    /// Extract a ZIP file, keeping Unix permission bits
    pub async fn extract_zip(archive: &Path, target_dir: &Path) -> Result<(), DownloadError> {
        info!("Extracting {:?} to {:?}", archive, target_dir);

        let archive = archive.to_path_buf();
        let target_dir = target_dir.to_path_buf();

        // Run in blocking task since zip crate is synchronous
        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&archive)
                .map_err(|e| DownloadError::io(&archive, e))?;
            let mut zip = zip::ZipArchive::new(file)
                .map_err(|e| DownloadError::Extraction(format!("{:?}: {}", archive, e)))?;

            for i in 0..zip.len() {
                let mut entry = zip.by_index(i)
                    .map_err(|e| DownloadError::Extraction(e.to_string()))?;

                let relative = entry.enclosed_name().ok_or_else(|| {
                    DownloadError::Extraction(format!("unsafe entry path {:?}", entry.name()))
                })?;
                let outpath = target_dir.join(relative);

                if entry.is_dir() {
                    std::fs::create_dir_all(&outpath)
                        .map_err(|e| DownloadError::io(&outpath, e))?;
                } else {
                    if let Some(parent) = outpath.parent() {
                        std::fs::create_dir_all(parent)
                            .map_err(|e| DownloadError::io(parent, e))?;
                    }
                    let mut outfile = std::fs::File::create(&outpath)
                        .map_err(|e| DownloadError::io(&outpath, e))?;
                    std::io::copy(&mut entry, &mut outfile)
                        .map_err(|e| DownloadError::Extraction(format!("{:?}: {}", outpath, e)))?;
                }

                // Set permissions on Unix
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Some(mode) = entry.unix_mode() {
                        std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                            .map_err(|e| DownloadError::io(&outpath, e))?;
                    }
                }
            }

            debug!("Extracted {} entries", zip.len());
            Ok(())
        }).await.map_err(|e| DownloadError::Extraction(e.to_string()))?
    }

    /// Get the target directory
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }
}

fn progress_bar(name: &str) -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template(
        "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
    ) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar.set_message(name.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, contents) in entries {
            let options = zip::write::FileOptions::default().unix_permissions(0o755);
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(
            ToolchainDownloader::archive_name(
                "https://dl.google.com/android/repository/commandlinetools-linux-6609375_latest.zip"
            ),
            "commandlinetools-linux-6609375_latest.zip"
        );
        assert_eq!(
            ToolchainDownloader::archive_name("https://mirror.example/emulator-linux-9.0.1.zip?token=x"),
            "emulator-linux-9.0.1.zip"
        );
        assert_eq!(ToolchainDownloader::archive_name("https://mirror.example/"), "download.zip");
    }

    #[tokio::test]
    async fn test_extract_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("tools.zip");
        write_zip(&archive, &[("tools/bin/sdkmanager", "#!/bin/sh\n"), ("tools/NOTICE.txt", "n")]);

        let dest = dir.path().join("cmdline-tools");
        ToolchainDownloader::extract_zip(&archive, &dest).await.unwrap();

        let sdkmanager = dest.join("tools").join("bin").join("sdkmanager");
        assert_eq!(std::fs::read_to_string(&sdkmanager).unwrap(), "#!/bin/sh\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&sdkmanager).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[tokio::test]
    async fn test_extract_rejects_escaping_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(&archive, &[("../outside.txt", "x")]);

        let err = ToolchainDownloader::extract_zip(&archive, &dir.path().join("dest"))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Extraction(_)));
        assert!(!dir.path().join("outside.txt").exists());
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip").unwrap();

        let err: SetupError = ToolchainDownloader::extract_zip(&archive, dir.path())
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, SetupError::Extraction(_)));
    }
}
