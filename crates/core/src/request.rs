//! Provision request: what the caller wants installed.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};

/// Parameters of a single provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// Android API level, e.g. 30
    pub api_level: u32,
    /// System image target variant, e.g. `google_apis`
    pub target: String,
    /// CPU architecture, e.g. `x86_64`
    pub arch: String,
    /// Exact emulator build to pin instead of the latest package
    pub emulator_build: Option<String>,
    /// NDK version to install (`ndk;<version>`)
    pub ndk_version: Option<String>,
    /// CMake version to install (`cmake;<version>`)
    pub cmake_version: Option<String>,
}

impl ProvisionRequest {
    /// Create a request for a system image with no optional components
    pub fn new(api_level: u32, target: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            api_level,
            target: target.into(),
            arch: arch.into(),
            emulator_build: None,
            ndk_version: None,
            cmake_version: None,
        }
    }

    /// Pin the emulator to a specific build
    pub fn with_emulator_build(mut self, build: impl Into<String>) -> Self {
        self.emulator_build = Some(build.into());
        self
    }

    /// Also install the given NDK version
    pub fn with_ndk(mut self, version: impl Into<String>) -> Self {
        self.ndk_version = Some(version.into());
        self
    }

    /// Also install the given CMake version
    pub fn with_cmake(mut self, version: impl Into<String>) -> Self {
        self.cmake_version = Some(version.into());
        self
    }

    /// Drop optional fields that were passed as blank strings.
    ///
    /// CI inputs arrive as empty strings rather than being absent.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        self.target = self.target.trim().to_string();
        self.arch = self.arch.trim().to_string();
        self.emulator_build = blank_to_none(self.emulator_build);
        self.ndk_version = blank_to_none(self.ndk_version);
        self.cmake_version = blank_to_none(self.cmake_version);
        self
    }

    /// Check the request before anything is touched
    pub fn validate(&self) -> Result<()> {
        if self.api_level == 0 {
            return Err(SetupError::Configuration("api level must be positive".into()));
        }
        if self.target.is_empty() {
            return Err(SetupError::Configuration("target must not be empty".into()));
        }
        if self.arch.is_empty() {
            return Err(SetupError::Configuration("arch must not be empty".into()));
        }

        for (name, value) in [
            ("target", Some(&self.target)),
            ("arch", Some(&self.arch)),
            ("emulator build", self.emulator_build.as_ref()),
            ("ndk version", self.ndk_version.as_ref()),
            ("cmake version", self.cmake_version.as_ref()),
        ] {
            if let Some(value) = value {
                if value.contains(';') || value.chars().any(char::is_whitespace) {
                    return Err(SetupError::Configuration(format!(
                        "{} `{}` is not a valid package identifier",
                        name, value
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = ProvisionRequest::new(30, "google_apis", "x86_64")
            .with_emulator_build("9.0.1")
            .with_ndk("21.0.6113669")
            .with_cmake("3.10.2.4988404");

        assert_eq!(request.emulator_build.as_deref(), Some("9.0.1"));
        assert_eq!(request.ndk_version.as_deref(), Some("21.0.6113669"));
        assert_eq!(request.cmake_version.as_deref(), Some("3.10.2.4988404"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_inputs_are_absent() {
        let mut request = ProvisionRequest::new(29, " default ", "x86");
        request.emulator_build = Some(String::new());
        request.ndk_version = Some("  ".into());

        let request = request.normalized();
        assert_eq!(request.target, "default");
        assert_eq!(request.emulator_build, None);
        assert_eq!(request.ndk_version, None);
    }

    #[test]
    fn test_validation_rejects_bad_requests() {
        assert!(ProvisionRequest::new(0, "default", "x86").validate().is_err());
        assert!(ProvisionRequest::new(29, "", "x86").validate().is_err());
        assert!(ProvisionRequest::new(29, "default", "").validate().is_err());
        assert!(ProvisionRequest::new(29, "default;x86", "x86").validate().is_err());
        assert!(ProvisionRequest::new(29, "default", "x86")
            .with_ndk("21 .0")
            .validate()
            .is_err());
    }
}
