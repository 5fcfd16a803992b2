//! Android Toolchain Provisioning
//!
//! Installs the Android SDK on a CI runner:
//! - Command-line tools bootstrap
//! - License pre-acceptance
//! - Build tools, platform tools and platforms
//! - Emulator (pinned build or latest) and system images
//! - Optional NDK and CMake

pub mod downloader;
pub mod env;
pub mod host;
pub mod licenses;
pub mod markers;
pub mod provisioner;
pub mod sdk_manager;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

pub use downloader::{DownloadError, ToolchainDownloader};
pub use env::EnvManager;
pub use host::{HostPlatform, HostProfile};
pub use markers::{Marker, MarkerStatus};
pub use provisioner::{ProvisionReport, SdkProvisioner, Step};
pub use sdk_manager::{SdkComponent, SdkManager};
pub use system::{CommandLine, ProcessOutcome, SdkHost, SystemHost};
