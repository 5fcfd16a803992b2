//! SDK Manager
//!
//! Names SDK packages and builds the package-manager invocations that
//! install them.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::host::HostPlatform;
use crate::system::CommandLine;

/// SDK component types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkComponent {
    Platform(u32),          // platforms;android-XX
    BuildTools(String),     // build-tools;XX.X.X
    PlatformTools,          // platform-tools
    Emulator,               // emulator
    SystemImage {           // system-images;android-XX;target;arch
        api_level: u32,
        target: String,
        arch: String,
    },
    Ndk(String),            // ndk;XX.X.XXXXX
    Cmake(String),          // cmake;X.XX.X
}

impl SdkComponent {
    /// Get the SDK manager package name
    pub fn package_name(&self) -> String {
        match self {
            SdkComponent::Platform(api) => format!("platforms;android-{}", api),
            SdkComponent::BuildTools(version) => format!("build-tools;{}", version),
            SdkComponent::PlatformTools => "platform-tools".to_string(),
            SdkComponent::Emulator => "emulator".to_string(),
            SdkComponent::SystemImage { api_level, target, arch } => {
                format!("system-images;android-{};{};{}", api_level, target, arch)
            }
            SdkComponent::Ndk(version) => format!("ndk;{}", version),
            SdkComponent::Cmake(version) => format!("cmake;{}", version),
        }
    }
}

impl fmt::Display for SdkComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package_name())
    }
}

/// Builds package-manager invocations for one SDK root
#[derive(Debug, Clone)]
pub struct SdkManager {
    executable: &'static str,
    sdk_root: PathBuf,
}

impl SdkManager {
    /// Create an SDK manager for `host`, operating on `sdk_root`
    pub fn new(host: HostPlatform, sdk_root: impl Into<PathBuf>) -> Self {
        Self {
            executable: host.sdkmanager_executable(),
            sdk_root: sdk_root.into(),
        }
    }

    /// Command line installing all `components` in one invocation
    pub fn install_command(&self, components: &[SdkComponent]) -> CommandLine {
        let mut cmd = CommandLine::new(self.executable)
            .arg("--install")
            .env("ANDROID_HOME", self.sdk_root.to_string_lossy())
            .env("ANDROID_SDK_ROOT", self.sdk_root.to_string_lossy());
        for component in components {
            cmd = cmd.arg(component.package_name());
        }
        cmd
    }
}

/// Locate an executable for spawning.
///
/// Looks on PATH first, then inside the command-line tools layouts under
/// `sdk_root`. Falls back to the bare name so the spawn error names it.
pub fn resolve_executable(name: &str, sdk_root: &Path) -> PathBuf {
    if let Ok(path) = which::which(name) {
        return path;
    }

    let candidates = [
        sdk_root.join("cmdline-tools").join("tools").join("bin").join(name),
        sdk_root.join("cmdline-tools").join("latest").join("bin").join(name),
        sdk_root.join("tools").join("bin").join(name),
    ];
    for candidate in candidates {
        if candidate.is_file() {
            debug!("Resolved {} to {:?}", name, candidate);
            return candidate;
        }
    }

    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_package_name() {
        assert_eq!(
            SdkComponent::Platform(30).package_name(),
            "platforms;android-30"
        );
        assert_eq!(
            SdkComponent::BuildTools("30.0.2".into()).package_name(),
            "build-tools;30.0.2"
        );
        assert_eq!(
            SdkComponent::SystemImage {
                api_level: 30,
                target: "google_apis".into(),
                arch: "x86_64".into(),
            }
            .package_name(),
            "system-images;android-30;google_apis;x86_64"
        );
        assert_eq!(SdkComponent::Ndk("21.0.6113669".into()).to_string(), "ndk;21.0.6113669");
        assert_eq!(SdkComponent::Cmake("3.10.2.4988404".into()).to_string(), "cmake;3.10.2.4988404");
    }

    #[test]
    fn test_install_command() {
        let manager = SdkManager::new(HostPlatform::Windows, "C:\\sdk");
        let cmd = manager.install_command(&[
            SdkComponent::BuildTools("30.0.2".into()),
            SdkComponent::PlatformTools,
            SdkComponent::Platform(29),
        ]);

        assert_eq!(cmd.program, "sdkmanager.bat");
        assert_eq!(
            cmd.args,
            vec!["--install", "build-tools;30.0.2", "platform-tools", "platforms;android-29"]
        );
        assert!(cmd.envs.iter().any(|(k, v)| k == "ANDROID_HOME" && v == "C:\\sdk"));
    }

    #[test]
    fn test_resolve_falls_back_to_cmdline_tools() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("cmdline-tools").join("tools").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("sdkmanager-test-only"), "").unwrap();

        assert_eq!(
            resolve_executable("sdkmanager-test-only", dir.path()),
            bin.join("sdkmanager-test-only")
        );
        assert_eq!(
            resolve_executable("no-such-tool-anywhere", dir.path()),
            PathBuf::from("no-such-tool-anywhere")
        );
    }
}
