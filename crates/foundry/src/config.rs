//! Filesystem locations used by Foundry.
//!
//! # Storage Structure
//!
//! All application data is stored under `~/.foundry/`:
//!
//! ```text
//! ~/.foundry/
//! ├── db/           # Record store snapshot (db.json)
//! └── config/       # User configuration (.env.local)
//! ```
//!
//! # Environment Variables
//!
//! - `FOUNDRY_STATE_DIR`: Override the base state directory
//! - `FOUNDRY_DB_DIR`: Override the database directory
//! - `FOUNDRY_CONFIG_DIR`: Override the config directory

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "FOUNDRY_STATE_DIR";

/// Environment variable for custom database directory.
pub const DB_DIR_ENV: &str = "FOUNDRY_DB_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "FOUNDRY_CONFIG_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".foundry";

const DB_SUBDIR: &str = "db";
const CONFIG_SUBDIR: &str = "config";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Foundry state directory.
///
/// The state directory is determined by:
/// 1. `FOUNDRY_STATE_DIR` environment variable if set
/// 2. `~/.foundry` if home directory is available
/// 3. `.foundry` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the database directory.
///
/// Defaults to `~/.foundry/db/` or `FOUNDRY_DB_DIR` env var.
pub fn db_dir() -> PathBuf {
    std::env::var(DB_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(DB_SUBDIR))
}

/// Get the user config directory.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the .env.local file path.
///
/// Environment file for deployment settings (public URL, CORS origins).
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Directories Foundry creates on startup.
///
/// Logs go to stderr, so there is no log directory.
pub fn managed_dirs() -> [PathBuf; 2] {
    [db_dir(), config_dir()]
}

/// Ensure the state directory and all subdirectories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    for dir in managed_dirs() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
