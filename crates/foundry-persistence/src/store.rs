//! Transactional store over a single database snapshot.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::database::Database;
use crate::error::{PersistenceError, Result};

/// File name of the snapshot inside the store directory.
const SNAPSHOT_FILE: &str = "db.json";

/// Prefix of the in-flight snapshot written next to `db.json`.
const PENDING_PREFIX: &str = ".db.json.";

/// Loads the snapshot at `path`; a missing file is an empty database.
fn load_snapshot(path: &Path) -> Result<Database> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Database::default()),
        Err(source) => {
            return Err(PersistenceError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&data).map_err(|source| PersistenceError::CorruptSnapshot {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `db` beside `path` and renames it over the old snapshot once it
/// is synced.
fn write_snapshot(path: &Path, db: &Database) -> Result<()> {
    let write_error = |source: std::io::Error| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let pending = tempfile::Builder::new()
        .prefix(PENDING_PREFIX)
        .tempfile_in(dir)
        .map_err(write_error)?;
    {
        let mut writer = BufWriter::new(pending.as_file());
        serde_json::to_writer_pretty(&mut writer, db)?;
        writer.flush().map_err(write_error)?;
    }
    pending.as_file().sync_all().map_err(write_error)?;
    pending.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Manages persistence of the whole record set.
///
/// Everything lives in one JSON snapshot:
/// ```text
/// base_path/
/// └── db.json
/// ```
///
/// Writers are serialized behind a lock. Each transaction runs against a
/// draft copy of the database; the draft replaces `db.json` on disk and
/// only then becomes visible. If the closure fails, or the write fails,
/// neither memory nor disk change.
pub struct Store {
    path: Option<PathBuf>,
    db: RwLock<Database>,
}

impl Store {
    /// Opens the store in `base_path`, loading the snapshot if present.
    ///
    /// The directory is created when missing. A snapshot that does not
    /// parse is an error rather than an empty database.
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref();
        fs::create_dir_all(base_path).map_err(|source| PersistenceError::DirectoryError {
            path: base_path.to_path_buf(),
            source,
        })?;
        let path = base_path.join(SNAPSHOT_FILE);
        let db = load_snapshot(&path)?;
        debug!(
            path = %path.display(),
            timeline_events = db.timeline_events.len(),
            "opened store"
        );
        Ok(Self {
            path: Some(path),
            db: RwLock::new(db),
        })
    }

    /// Creates a store that never touches disk.
    pub fn in_memory() -> Self {
        Self::with_database(Database::default())
    }

    /// Creates an in-memory store seeded with `db`.
    pub fn with_database(db: Database) -> Self {
        Self {
            path: None,
            db: RwLock::new(db),
        }
    }

    /// Path of the snapshot file, if the store is disk-backed.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs a read-only closure against the current snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&Database) -> T) -> Result<T> {
        let db = self
            .db
            .read()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        Ok(f(&db))
    }

    /// Runs `f` as one all-or-nothing transaction.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&mut Database) -> std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<PersistenceError>,
    {
        let mut db = self
            .db
            .write()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;

        let mut draft = db.clone();
        let value = f(&mut draft)?;

        if let Some(path) = &self.path {
            write_snapshot(path, &draft)?;
        }
        *db = draft;

        Ok(value)
    }

    /// Replaces the entire record set.
    pub fn replace(&self, replacement: Database) -> Result<()> {
        self.transaction(|db| {
            *db = replacement;
            Ok::<_, PersistenceError>(())
        })
    }

    /// Returns a copy of the current record set.
    pub fn snapshot(&self) -> Result<Database> {
        self.read(Database::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_models::{Founder, Startup};
    use tempfile::tempdir;

    #[test]
    fn test_transaction_commits() {
        let store = Store::in_memory();

        store
            .transaction(|db| {
                db.insert_startup(Startup::new("Acme", "acme"));
                Ok::<_, PersistenceError>(())
            })
            .unwrap();

        assert_eq!(store.read(|db| db.startups.len()).unwrap(), 1);
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let store = Store::in_memory();

        let result: Result<()> = store.transaction(|db| {
            db.insert_startup(Startup::new("Acme", "acme"));
            Err(PersistenceError::not_found("founder", "founder-x"))
        });

        assert!(result.is_err());
        assert_eq!(store.read(|db| db.startups.len()).unwrap(), 0);
    }

    #[test]
    fn test_persists_and_reopens() {
        let dir = tempdir().unwrap();
        let startup = Startup::new("Acme", "acme");
        let startup_id = startup.id.clone();

        {
            let store = Store::open(dir.path()).unwrap();
            store
                .transaction(|db| {
                    db.insert_startup(startup);
                    db.insert_founder(
                        Founder::new("Ada", "ada@example.com").in_startup(startup_id.clone()),
                    );
                    Ok::<_, PersistenceError>(())
                })
                .unwrap();
        }

        let reopened = Store::open(dir.path()).unwrap();
        let (slug, founders) = reopened
            .read(|db| {
                (
                    db.startup(&startup_id).map(|s| s.slug.clone()),
                    db.founders_of(&startup_id).count(),
                )
            })
            .unwrap();

        assert_eq!(slug.unwrap(), "acme");
        assert_eq!(founders, 1);
    }

    #[test]
    fn test_failed_transaction_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store
            .transaction(|db| {
                db.insert_startup(Startup::new("Acme", "acme"));
                Ok::<_, PersistenceError>(())
            })
            .unwrap();
        let before = std::fs::read_to_string(store.snapshot_path().unwrap()).unwrap();

        let _ = store.transaction(|db| {
            db.insert_startup(Startup::new("Globex", "globex"));
            Err::<(), _>(PersistenceError::not_found("startup", "startup-x"))
        });

        let after = std::fs::read_to_string(store.snapshot_path().unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_open_empty_directory() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(store.read(|db| db.timeline_events.is_empty()).unwrap());
        assert!(!store.snapshot_path().unwrap().exists());
    }

    #[test]
    fn test_commit_leaves_only_snapshot() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        for slug in ["acme", "globex", "initech"] {
            store
                .transaction(|db| {
                    db.insert_startup(Startup::new(slug, slug));
                    Ok::<_, PersistenceError>(())
                })
                .unwrap();
        }

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(SNAPSHOT_FILE)]);
        assert_eq!(Store::open(dir.path()).unwrap().snapshot().unwrap().startups.len(), 3);
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state/db");
        let store = Store::open(&nested).unwrap();
        store.replace(Database::default()).unwrap();
        assert!(nested.join(SNAPSHOT_FILE).exists());
    }

    #[test]
    fn test_open_corrupt_snapshot() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SNAPSHOT_FILE), "{ not json").unwrap();

        assert!(matches!(
            Store::open(dir.path()),
            Err(PersistenceError::CorruptSnapshot { .. })
        ));
    }

    #[test]
    fn test_replace() {
        let store = Store::in_memory();
        let mut db = Database::default();
        db.insert_startup(Startup::new("Acme", "acme"));

        store.replace(db).unwrap();
        assert_eq!(store.snapshot().unwrap().startups.len(), 1);
    }
}
