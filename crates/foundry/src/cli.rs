//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

use crate::config;

/// Foundry - startup accelerator backend
#[derive(Parser, Debug)]
#[command(name = "foundry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "FOUNDRY_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long, env = "FOUNDRY_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, env = "FOUNDRY_PORT", default_value_t = 4000)]
        port: u16,

        /// Site root for download and share URLs (default: the bind address)
        #[arg(long, env = "FOUNDRY_PUBLIC_URL")]
        public_url: Option<Url>,

        /// Allowed CORS origins, comma separated
        #[arg(long, env = "FOUNDRY_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
        cors_origins: Vec<String>,
    },

    /// Replace all records with the contents of a JSON snapshot
    Import {
        /// Snapshot file to load
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Write all records as a JSON snapshot
    Export {
        /// Output file (default: stdout)
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Returns the state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(config::state_dir)
    }

    /// Returns the directory holding the record store.
    pub fn db_dir(&self) -> PathBuf {
        match self.state_dir {
            Some(ref dir) => dir.join("db"),
            None => config::db_dir(),
        }
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
