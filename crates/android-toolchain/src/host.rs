//! Host Platform
//!
//! Resolves the runner's operating system and holds everything that differs
//! between hosts in a single table: archive naming, executable naming, and
//! which Linux-only steps apply.

use std::fmt;

use android_sdk_setup_core::{Result, SetupError};

/// The three supported runner operating systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPlatform {
    MacOs,
    Windows,
    Linux,
}

/// Per-host constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostProfile {
    pub platform: HostPlatform,
    /// `std::env::consts::OS` value for this host
    pub os_id: &'static str,
    /// Host tag in `commandlinetools-<tag>-<build>_latest.zip`
    pub cmdline_tools_tag: &'static str,
    /// Host tag in `emulator-<tag>-<build>.zip`
    pub emulator_tag: &'static str,
    /// Package-manager executable name
    pub sdkmanager: &'static str,
    /// Whether the SDK root must be chowned to the invoking user
    pub normalizes_ownership: bool,
    /// Whether the preview license is pre-accepted
    pub accepts_preview_license: bool,
}

const HOST_PROFILES: [HostProfile; 3] = [
    HostProfile {
        platform: HostPlatform::MacOs,
        os_id: "macos",
        cmdline_tools_tag: "mac",
        emulator_tag: "darwin",
        sdkmanager: "sdkmanager",
        normalizes_ownership: false,
        accepts_preview_license: false,
    },
    HostProfile {
        platform: HostPlatform::Windows,
        os_id: "windows",
        cmdline_tools_tag: "win",
        emulator_tag: "windows",
        sdkmanager: "sdkmanager.bat",
        normalizes_ownership: false,
        accepts_preview_license: false,
    },
    HostProfile {
        platform: HostPlatform::Linux,
        os_id: "linux",
        cmdline_tools_tag: "linux",
        emulator_tag: "linux",
        sdkmanager: "sdkmanager",
        normalizes_ownership: true,
        accepts_preview_license: true,
    },
];

impl HostPlatform {
    /// All supported hosts
    pub const ALL: [HostPlatform; 3] = [HostPlatform::MacOs, HostPlatform::Windows, HostPlatform::Linux];

    /// Map an OS identifier (as reported by `std::env::consts::OS`) to a host
    pub fn from_os_identifier(os: &str) -> Result<Self> {
        HOST_PROFILES
            .iter()
            .find(|profile| profile.os_id == os)
            .map(|profile| profile.platform)
            .ok_or_else(|| {
                SetupError::Configuration(format!(
                    "unsupported host operating system `{}` (expected macos, windows or linux)",
                    os
                ))
            })
    }

    /// The host this process runs on
    pub fn current() -> Result<Self> {
        Self::from_os_identifier(std::env::consts::OS)
    }

    /// Constants for this host
    pub fn profile(self) -> &'static HostProfile {
        match self {
            HostPlatform::MacOs => &HOST_PROFILES[0],
            HostPlatform::Windows => &HOST_PROFILES[1],
            HostPlatform::Linux => &HOST_PROFILES[2],
        }
    }

    /// Command-line tools archive URL
    pub fn cmdline_tools_url(self, repository: &str, build: &str) -> String {
        format!(
            "{}/commandlinetools-{}-{}_latest.zip",
            repository.trim_end_matches('/'),
            self.profile().cmdline_tools_tag,
            build
        )
    }

    /// Pinned emulator archive URL
    pub fn emulator_url(self, repository: &str, build: &str) -> String {
        format!(
            "{}/emulator-{}-{}.zip",
            repository.trim_end_matches('/'),
            self.profile().emulator_tag,
            build
        )
    }

    /// Package-manager executable name
    pub fn sdkmanager_executable(self) -> &'static str {
        self.profile().sdkmanager
    }

    /// Separator used in the PATH variable
    pub fn path_separator(self) -> char {
        match self {
            HostPlatform::Windows => ';',
            HostPlatform::MacOs | HostPlatform::Linux => ':',
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostPlatform::MacOs => "macOS",
            HostPlatform::Windows => "Windows",
            HostPlatform::Linux => "Linux",
        };
        f.write_str(name)
    }
}
