//! SDK Provisioner
//!
//! Installs everything a CI job needs to build for and boot an Android
//! system image, in this order:
//!
//! 1. hand ownership of the SDK root to the invoking user (Linux)
//! 2. bootstrap the command-line tools, unless already present
//! 3. pre-accept the licenses the later installs would prompt for
//! 4. build-tools, platform-tools and the requested platform
//! 5. the emulator, either a pinned build or the latest package
//! 6. the system image, then the optional NDK and CMake
//!
//! Every step is either guarded by a marker under the SDK root or safe to
//! repeat, so a failed run is retried by running the whole thing again.
//! The first failing step aborts the run; nothing is rolled back.

use std::path::{Path, PathBuf};
use tracing::{info, debug, warn};

use android_sdk_setup_core::{ProvisionRequest, Result, SetupConfig, SetupError};

use crate::host::HostPlatform;
use crate::licenses::{self, License};
use crate::markers::{self, Marker};
use crate::sdk_manager::{SdkComponent, SdkManager};
use crate::system::{CommandLine, SdkHost};

/// A provisioning step, as reported after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    NormalizeOwnership,
    CmdlineTools,
    License(&'static str),
    CorePackages,
    PinnedEmulator,
    LatestEmulator,
    SystemImage,
    Ndk,
    Cmake,
}

/// What a run did and what it found already in place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub performed: Vec<Step>,
    pub skipped: Vec<Step>,
}

/// Installs the Android SDK into one SDK root
pub struct SdkProvisioner<H: SdkHost> {
    host: H,
    platform: HostPlatform,
    sdk_root: PathBuf,
    config: SetupConfig,
    user: Option<String>,
}

impl<H: SdkHost> SdkProvisioner<H> {
    /// Create a provisioner
    pub fn new(host: H, platform: HostPlatform, sdk_root: impl Into<PathBuf>, config: SetupConfig) -> Self {
        Self {
            host,
            platform,
            sdk_root: sdk_root.into(),
            config,
            user: None,
        }
    }

    /// User the SDK root is handed to before any write (Linux only)
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn sdk_root(&self) -> &Path {
        &self.sdk_root
    }

    fn sdk_manager(&self) -> SdkManager {
        SdkManager::new(self.platform, &self.sdk_root)
    }

    /// Install the SDK components described by `request`
    pub async fn install_sdk(&self, request: &ProvisionRequest) -> Result<ProvisionReport> {
        request.validate()?;
        let owner = self.required_owner()?;

        info!(
            "Provisioning Android SDK at {:?} on {} (API {}, {}, {})",
            self.sdk_root, self.platform, request.api_level, request.target, request.arch
        );

        let mut report = ProvisionReport::default();

        if let Some(owner) = owner {
            self.normalize_ownership(owner).await?;
            report.performed.push(Step::NormalizeOwnership);
        }

        if self.bootstrap_cmdline_tools().await? {
            report.performed.push(Step::CmdlineTools);
        } else {
            report.skipped.push(Step::CmdlineTools);
        }

        for (license, written) in self.accept_licenses(request.api_level).await? {
            if written {
                report.performed.push(Step::License(license.name));
            } else {
                report.skipped.push(Step::License(license.name));
            }
        }

        info!("Installing latest build tools, platform tools, and platform.");
        self.install_packages(&[
            SdkComponent::BuildTools(self.config.build_tools_version.clone()),
            SdkComponent::PlatformTools,
            SdkComponent::Platform(request.api_level),
        ])
        .await?;
        report.performed.push(Step::CorePackages);

        report.performed.push(self.install_emulator(request.emulator_build.as_deref()).await?);

        info!("Installing system images.");
        self.install_packages(&[SdkComponent::SystemImage {
            api_level: request.api_level,
            target: request.target.clone(),
            arch: request.arch.clone(),
        }])
        .await?;
        report.performed.push(Step::SystemImage);

        if let Some(ref version) = request.ndk_version {
            info!("Installing NDK {}.", version);
            self.install_packages(&[SdkComponent::Ndk(version.clone())]).await?;
            report.performed.push(Step::Ndk);
        }

        if let Some(ref version) = request.cmake_version {
            info!("Installing CMake {}.", version);
            self.install_packages(&[SdkComponent::Cmake(version.clone())]).await?;
            report.performed.push(Step::Cmake);
        }

        info!("Android SDK provisioned at {:?}", self.sdk_root);
        Ok(report)
    }

    fn required_owner(&self) -> Result<Option<&str>> {
        if !self.platform.profile().normalizes_ownership {
            return Ok(None);
        }
        self.user
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(Some)
            .ok_or_else(|| {
                SetupError::Configuration(format!(
                    "cannot take ownership of {:?}: invoking user is unknown",
                    self.sdk_root
                ))
            })
    }

    /// Recursively chown the SDK root to `owner`
    async fn normalize_ownership(&self, owner: &str) -> Result<()> {
        info!("Taking ownership of {:?} as {}", self.sdk_root, owner);
        let cmd = CommandLine::new("sudo")
            .arg("chown")
            .arg("-R")
            .arg(format!("{}:{}", owner, owner))
            .arg(self.sdk_root.to_string_lossy());
        self.run(&cmd).await
    }

    /// Download and unpack the command-line tools unless already present.
    /// Returns whether anything was installed.
    async fn bootstrap_cmdline_tools(&self) -> Result<bool> {
        let cmdline_tools = markers::cmdline_tools_dir(&self.sdk_root);
        if markers::is_installed(&self.host, &self.sdk_root, Marker::CmdlineTools).await {
            debug!("{:?} exists, skipping command-line tools", cmdline_tools);
            return Ok(false);
        }

        info!("Installing new cmdline-tools.");
        let url = self
            .platform
            .cmdline_tools_url(self.config.repository(), &self.config.cmdline_tools_build);
        let archive = self.host.fetch_archive(&url).await?;

        // The directory is the marker: it may only survive a complete extract.
        self.host.ensure_directory(&cmdline_tools).await?;
        if let Err(err) = self.host.extract_archive(&archive, &cmdline_tools).await {
            warn!("Removing partial {:?} after failed extraction", cmdline_tools);
            self.host.remove_recursive(&cmdline_tools).await?;
            return Err(err);
        }

        self.host.register_search_paths(&self.tool_paths()).await?;
        Ok(true)
    }

    /// Directories added to PATH after the bootstrap, in order
    pub fn tool_paths(&self) -> Vec<PathBuf> {
        let tools = markers::cmdline_tools_dir(&self.sdk_root).join("tools");
        vec![
            tools.clone(),
            tools.join("bin"),
            self.sdk_root.join("platform-tools"),
        ]
    }

    /// Write the license files that apply and are missing
    async fn accept_licenses(&self, api_level: u32) -> Result<Vec<(License, bool)>> {
        let mut results = Vec::new();
        let mut dir_ready = false;

        for license in licenses::required_licenses(self.platform, api_level) {
            if markers::is_installed(&self.host, &self.sdk_root, Marker::License(license)).await {
                debug!("License {} already accepted", license.name);
                results.push((license, false));
                continue;
            }

            if !dir_ready {
                self.host
                    .ensure_directory(&licenses::licenses_dir(&self.sdk_root))
                    .await?;
                dir_ready = true;
            }

            info!("Accepting {}", license.name);
            self.host
                .write_file(&license.path(&self.sdk_root), &license.contents())
                .await?;
            results.push((license, true));
        }

        Ok(results)
    }

    async fn install_emulator(&self, pinned_build: Option<&str>) -> Result<Step> {
        match pinned_build {
            Some(build) => {
                info!("Installing emulator build {}.", build);
                self.host
                    .remove_recursive(&markers::emulator_dir(&self.sdk_root))
                    .await?;
                let url = self.platform.emulator_url(self.config.repository(), build);
                let archive = self.host.fetch_archive(&url).await?;
                self.host.extract_archive(&archive, &self.sdk_root).await?;
                Ok(Step::PinnedEmulator)
            }
            None => {
                info!("Installing latest emulator.");
                self.install_packages(&[SdkComponent::Emulator]).await?;
                Ok(Step::LatestEmulator)
            }
        }
    }

    async fn install_packages(&self, components: &[SdkComponent]) -> Result<()> {
        let cmd = self.sdk_manager().install_command(components);
        self.run(&cmd).await
    }

    async fn run(&self, cmd: &CommandLine) -> Result<()> {
        debug!("Running {}", cmd);
        self.host.run_command(cmd).await?.check(cmd)
    }
}
