//! android-sdk-setup
//!
//! Provisions the Android SDK on continuous-integration runners: the
//! command-line tools, pre-accepted licenses, build tools, platform tools,
//! a platform, the emulator, a system image and optionally the NDK and CMake.
//!
//! ## Architecture
//!
//! - `android-sdk-setup-core`: configuration, the provision request, errors
//! - `android-sdk-setup-toolchain`: host resolution, downloads, the package
//!   manager and the provisioning workflow

#![warn(clippy::all)]

pub mod cli;
pub mod commands;

// Re-export member crates for library usage
pub use android_sdk_setup_core as core;
pub use android_sdk_setup_toolchain as toolchain;

/// Prelude module for convenient imports
pub mod prelude {
    pub use android_sdk_setup_core::{ProvisionRequest, SetupConfig, SetupError};
    pub use android_sdk_setup_toolchain::{HostPlatform, SdkHost, SdkProvisioner, SystemHost};
}
