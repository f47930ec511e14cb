//! voice-intake CLI entrypoint

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voice_intake::cli::Cli;
use voice_intake::config::load_env_file;

#[tokio::main]
async fn main() -> Result<()> {
    // Local development: seed the environment from .env if present
    let env_file = load_env_file(Path::new(".env"));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = env_file {
        warn!(error = %e, "Ignoring malformed .env file");
    }

    // Parse and execute CLI
    let cli = Cli::parse();
    cli.execute().await
}
