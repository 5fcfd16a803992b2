//! Pre-accepted SDK licenses
//!
//! The package manager treats a license as accepted when
//! `<root>/licenses/<name>` holds its hash after a leading newline. Writing
//! these ahead of time keeps installs from waiting on a consent prompt.

use std::path::{Path, PathBuf};

use crate::host::HostPlatform;

/// A license the package manager may ask about
#[derive(Debug, Clone, Copy)]
pub struct License {
    /// File name under `licenses/`
    pub name: &'static str,
    /// Accepted-license hash published by the repository
    pub hash: &'static str,
    applies: fn(HostPlatform, u32) -> bool,
}

pub const PREVIEW_LICENSE: License = License {
    name: "android-sdk-preview-license",
    hash: "84831b9409646a918e30573bab4c9c91346d8abd",
    applies: |host, _| host.profile().accepts_preview_license,
};

/// Required by API 30 system images
pub const ARM_DBT_LICENSE: License = License {
    name: "android-sdk-arm-dbt-license",
    hash: "859f317696f67ef3d7f30a50a5560e7834b43903",
    applies: |_, api_level| api_level == 30,
};

const LICENSES: [License; 2] = [PREVIEW_LICENSE, ARM_DBT_LICENSE];

impl License {
    /// File contents the package manager expects
    pub fn contents(&self) -> String {
        format!("\n{}", self.hash)
    }

    /// Location of the license file under `sdk_root`
    pub fn path(&self, sdk_root: &Path) -> PathBuf {
        licenses_dir(sdk_root).join(self.name)
    }

    pub fn applies_to(&self, host: HostPlatform, api_level: u32) -> bool {
        (self.applies)(host, api_level)
    }
}

/// `<root>/licenses`
pub fn licenses_dir(sdk_root: &Path) -> PathBuf {
    sdk_root.join("licenses")
}

/// Licenses to pre-accept for `host` and `api_level`, in write order
pub fn required_licenses(host: HostPlatform, api_level: u32) -> Vec<License> {
    LICENSES
        .into_iter()
        .filter(|license| license.applies_to(host, api_level))
        .collect()
}
