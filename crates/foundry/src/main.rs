//! Foundry entry point.
//!
//! Start the API with:
//! ```bash
//! FOUNDRY_PUBLIC_URL=https://www.example.com cargo run -p foundry -- serve
//! ```

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use foundry::cli::Cli;
use foundry::{commands, config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from config directory first
    let env_path = config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    // stdout carries `export` output.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.state_dir.is_none() {
        if let Err(e) = config::ensure_all_dirs() {
            tracing::warn!(error = %e, "Failed to create all directories");
        }
    }

    let db_dir = cli.db_dir();
    tracing::debug!(state_dir = %cli.state_dir().display(), db_dir = %db_dir.display(), "resolved directories");

    commands::execute(cli.command, &db_dir).await
}
