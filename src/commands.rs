//! Command executors for the CLI

use std::path::PathBuf;
use anyhow::Result;
use tracing::info;

use android_sdk_setup_core::{config, resolve_sdk_root, ProvisionRequest, SetupConfig};
use android_sdk_setup_toolchain::{markers, HostPlatform, ProvisionReport, SdkProvisioner, SystemHost};

use crate::cli::{InstallArgs, StatusArgs};

/// Install command options
pub struct InstallCommand {
    pub request: ProvisionRequest,
    pub sdk_root: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

impl InstallCommand {
    pub fn from_args(args: InstallArgs, config_path: Option<PathBuf>) -> Self {
        let request = ProvisionRequest {
            api_level: args.api_level,
            target: args.target,
            arch: args.arch,
            emulator_build: args.emulator_build,
            ndk_version: args.ndk_version,
            cmake_version: args.cmake_version,
        };

        Self {
            request: request.normalized(),
            sdk_root: args.sdk_root,
            config_path,
        }
    }

    /// Execute the install command
    pub async fn execute(&self) -> Result<ProvisionReport> {
        self.request.validate()?;
        let config = SetupConfig::load(self.config_path.as_deref()).await?;
        let sdk_root = resolve_sdk_root(self.sdk_root.clone())?;
        let platform = HostPlatform::current()?;

        let host = SystemHost::new(&config, platform, &sdk_root)?;
        let mut provisioner = SdkProvisioner::new(host, platform, sdk_root, config);
        if platform.profile().normalizes_ownership {
            provisioner = provisioner.with_user(config::invoking_user()?);
        }

        let report = provisioner.install_sdk(&self.request).await?;
        info!(
            "Done: {} steps performed, {} already in place",
            report.performed.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Status command options
pub struct StatusCommand {
    pub api_level: u32,
    pub sdk_root: Option<PathBuf>,
    pub json: bool,
}

impl StatusCommand {
    pub fn from_args(args: StatusArgs) -> Self {
        Self {
            api_level: args.api_level,
            sdk_root: args.sdk_root,
            json: args.json,
        }
    }

    /// Print which markers are present under the SDK root
    pub async fn execute(&self) -> Result<()> {
        let sdk_root = resolve_sdk_root(self.sdk_root.clone())?;
        let platform = HostPlatform::current()?;
        let host = SystemHost::new(&SetupConfig::default(), platform, &sdk_root)?;

        let statuses = markers::collect_status(&host, platform, &sdk_root, self.api_level).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        } else {
            println!("SDK root: {}", sdk_root.display());
            for status in &statuses {
                let state = if status.present { "present" } else { "missing" };
                println!("  {:<32} {}", status.name, state);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_command_normalizes_blank_inputs() {
        let args = InstallArgs {
            api_level: 29,
            target: "google_apis".into(),
            arch: "x86_64".into(),
            emulator_build: Some(String::new()),
            ndk_version: Some("21.0.6113669".into()),
            cmake_version: Some(" ".into()),
            sdk_root: None,
        };

        let command = InstallCommand::from_args(args, None);
        assert_eq!(command.request.emulator_build, None);
        assert_eq!(command.request.ndk_version.as_deref(), Some("21.0.6113669"));
        assert_eq!(command.request.cmake_version, None);
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_touching_anything() {
        let dir = std::env::temp_dir().join("android-sdk-setup-never-created");
        let command = InstallCommand {
            request: ProvisionRequest::new(0, "default", "x86"),
            sdk_root: Some(dir.clone()),
            config_path: None,
        };

        let err = command.execute().await.unwrap_err();
        assert!(err
            .downcast_ref::<android_sdk_setup_core::SetupError>()
            .is_some_and(|e| e.is_configuration()));
        assert!(!dir.exists());
    }
}
