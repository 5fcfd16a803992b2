//! Idempotence markers
//!
//! Provisioning keeps no state of its own. Whether a step already ran is
//! read back from files and directories under the SDK root.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::host::HostPlatform;
use crate::licenses::{self, License};
use crate::system::SdkHost;

/// Something on disk whose presence means a step can be skipped
#[derive(Debug, Clone, Copy)]
pub enum Marker {
    /// `<root>/cmdline-tools`
    CmdlineTools,
    /// `<root>/licenses/<name>`
    License(License),
    /// `<root>/emulator`
    Emulator,
}

impl Marker {
    pub fn name(&self) -> &'static str {
        match self {
            Marker::CmdlineTools => "cmdline-tools",
            Marker::License(license) => license.name,
            Marker::Emulator => "emulator",
        }
    }

    pub fn path(&self, sdk_root: &Path) -> PathBuf {
        match self {
            Marker::CmdlineTools => cmdline_tools_dir(sdk_root),
            Marker::License(license) => license.path(sdk_root),
            Marker::Emulator => emulator_dir(sdk_root),
        }
    }
}

/// `<root>/cmdline-tools`
pub fn cmdline_tools_dir(sdk_root: &Path) -> PathBuf {
    sdk_root.join("cmdline-tools")
}

/// `<root>/emulator`
pub fn emulator_dir(sdk_root: &Path) -> PathBuf {
    sdk_root.join("emulator")
}

/// Whether the step guarded by `marker` has already run
pub async fn is_installed(host: &dyn SdkHost, sdk_root: &Path, marker: Marker) -> bool {
    host.path_exists(&marker.path(sdk_root)).await
}

/// Presence of one marker, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerStatus {
    pub name: &'static str,
    pub path: PathBuf,
    pub present: bool,
}

/// Markers relevant to a run on `platform` for `api_level`
pub fn relevant_markers(platform: HostPlatform, api_level: u32) -> Vec<Marker> {
    let mut markers = vec![Marker::CmdlineTools];
    markers.extend(
        licenses::required_licenses(platform, api_level)
            .into_iter()
            .map(Marker::License),
    );
    markers.push(Marker::Emulator);
    markers
}

/// Check every relevant marker without changing anything
pub async fn collect_status(
    host: &dyn SdkHost,
    platform: HostPlatform,
    sdk_root: &Path,
    api_level: u32,
) -> Vec<MarkerStatus> {
    let mut statuses = Vec::new();
    for marker in relevant_markers(platform, api_level) {
        statuses.push(MarkerStatus {
            name: marker.name(),
            path: marker.path(sdk_root),
            present: is_installed(host, sdk_root, marker).await,
        });
    }
    statuses
}
