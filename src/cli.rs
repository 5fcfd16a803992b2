//! CLI definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Provision the Android SDK on a CI runner
#[derive(Parser, Debug)]
#[command(
    name = "android-sdk-setup",
    author,
    version,
    about = "Install Android SDK components, the emulator and system images on CI runners",
    after_help = "Examples:\n    \
                  android-sdk-setup install --api-level 30 --target google_apis --arch x86_64\n    \
                  android-sdk-setup install --api-level 29 --emulator-build 6885378 --ndk-version 21.0.6113669\n    \
                  android-sdk-setup status --api-level 30"
)]
pub struct Cli {
    /// Configuration file (defaults to the per-user config.toml when present)
    #[arg(long, short = 'c', global = true, env = "SDK_SETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log package-manager output and skipped steps
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the SDK, emulator and a system image
    Install(InstallArgs),

    /// Report which install markers exist under the SDK root
    Status(StatusArgs),
}

/// Arguments for the install command
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Android API level of the platform and system image
    #[arg(long, env = "SDK_SETUP_API_LEVEL")]
    pub api_level: u32,

    /// System image target (default, google_apis, playstore, ...)
    #[arg(long, env = "SDK_SETUP_TARGET", default_value = "default")]
    pub target: String,

    /// System image CPU architecture
    #[arg(long, env = "SDK_SETUP_ARCH", default_value = "x86")]
    pub arch: String,

    /// Exact emulator build to install instead of the latest package
    #[arg(long, env = "SDK_SETUP_EMULATOR_BUILD")]
    pub emulator_build: Option<String>,

    /// NDK version to install
    #[arg(long, env = "SDK_SETUP_NDK_VERSION")]
    pub ndk_version: Option<String>,

    /// CMake version to install
    #[arg(long, env = "SDK_SETUP_CMAKE_VERSION")]
    pub cmake_version: Option<String>,

    /// SDK root (defaults to ANDROID_HOME, then ANDROID_SDK_ROOT)
    #[arg(long)]
    pub sdk_root: Option<PathBuf>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API level whose license requirements are checked
    #[arg(long, env = "SDK_SETUP_API_LEVEL", default_value_t = 30)]
    pub api_level: u32,

    /// SDK root (defaults to ANDROID_HOME, then ANDROID_SDK_ROOT)
    #[arg(long)]
    pub sdk_root: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
