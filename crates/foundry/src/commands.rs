//! Command implementations.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::info;
use url::Url;

use foundry_api::{serve, ApiConfig, AppState};
use foundry_persistence::{Database, Store};
use foundry_timeline::LogNotifier;

use crate::cli::Commands;

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command against the store in `db_dir`.
pub async fn execute(command: Commands, db_dir: &Path) -> Result<()> {
    fs::create_dir_all(db_dir)?;
    let store = Store::open(db_dir)?;

    match command {
        Commands::Serve {
            host,
            port,
            public_url,
            cors_origins,
        } => cmd_serve(store, host, port, public_url, cors_origins).await,
        Commands::Import { file } => cmd_import(&store, &file),
        Commands::Export { file } => cmd_export(&store, file.as_deref()),
    }
}

async fn cmd_serve(
    store: Store,
    host: String,
    port: u16,
    public_url: Option<Url>,
    cors_origins: Vec<String>,
) -> Result<()> {
    let mut config = ApiConfig::new(host, port).with_cors_origins(cors_origins);
    if let Some(url) = public_url {
        config = config.with_public_url(url);
    }
    let site = config.public_url()?;
    info!(bind = %config.bind_address(), public_url = %site, "starting Foundry API");

    let state = AppState::new(config, Arc::new(store), Arc::new(LogNotifier))?;
    serve(state).await?;
    Ok(())
}

/// Loads a snapshot file and makes it the whole record set.
pub fn cmd_import(store: &Store, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let db: Database = serde_json::from_str(&text)?;
    let (startups, events) = (db.startups.len(), db.timeline_events.len());

    store.replace(db)?;
    info!(
        file = %file.display(),
        startups,
        timeline_events = events,
        "imported snapshot"
    );
    println!(
        "Imported {} startups and {} timeline events",
        startups, events
    );
    Ok(())
}

/// Writes the record set to `file`, or stdout when no file is given.
pub fn cmd_export(store: &Store, file: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(&store.snapshot()?)?;
    match file {
        Some(path) => {
            fs::write(path, json)?;
            info!(file = %path.display(), "exported snapshot");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_models::Startup;
    use foundry_persistence::PersistenceError;
    use tempfile::tempdir;

    #[test]
    fn test_export_then_import() {
        let source_dir = tempdir().unwrap();
        let source = Store::open(source_dir.path()).unwrap();
        source
            .transaction(|db| {
                db.insert_startup(Startup::new("Acme", "acme"));
                Ok::<_, PersistenceError>(())
            })
            .unwrap();

        let out = source_dir.path().join("export.json");
        cmd_export(&source, Some(&out)).unwrap();

        let target_dir = tempdir().unwrap();
        let target = Store::open(target_dir.path()).unwrap();
        cmd_import(&target, &out).unwrap();

        let reopened = Store::open(target_dir.path()).unwrap();
        let slugs: Vec<String> = reopened
            .read(|db| db.startups.values().map(|s| s.slug.clone()).collect())
            .unwrap();
        assert_eq!(slugs, vec!["acme".to_string()]);
    }

    #[test]
    fn test_import_rejects_malformed_snapshot() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{ not json").unwrap();

        let store = Store::open(dir.path()).unwrap();
        assert!(cmd_import(&store, &file).is_err());
        assert!(store.snapshot_path().map_or(false, |p| !p.exists()));
    }
}
