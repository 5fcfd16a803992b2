//! android-sdk-setup - provision the Android SDK on CI runners
//!
//! Parses the command line, initializes logging and dispatches to the
//! command executors.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use android_sdk_setup::cli::{Cli, Commands};
use android_sdk_setup::commands::{InstallCommand, StatusCommand};
use android_sdk_setup::core::SetupError;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main entry point
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    info!("android-sdk-setup v{}", VERSION);

    let result = match cli.command {
        Commands::Install(args) => InstallCommand::from_args(args, cli.config)
            .execute()
            .await
            .map(|_| ()),
        Commands::Status(args) => StatusCommand::from_args(args).execute().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = match err.downcast_ref::<SetupError>() {
                Some(setup) => setup.user_message(),
                None => format!("{:#}", err),
            };
            error!("{}", message);
            ExitCode::FAILURE
        }
    }
}
