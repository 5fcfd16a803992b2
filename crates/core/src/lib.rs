//! android-sdk-setup core - shared types
//!
//! Configuration, the provision request and the error taxonomy used by the
//! toolchain crate and the CLI.

pub mod config;
pub mod error;
pub mod request;

pub use config::{resolve_sdk_root, SetupConfig};
pub use error::{Result, SetupError};
pub use request::ProvisionRequest;

/// android-sdk-setup version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
