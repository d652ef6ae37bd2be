//! Persistence layer for Foundry.
//!
//! All Foundry records live in one JSON snapshot. Transactions are
//! all-or-nothing: a commit replaces the snapshot file with a fully
//! written sibling, so a crash never leaves half a database on disk.
//!
//! # Example
//!
//! ```no_run
//! use foundry_persistence::{PersistenceError, Store};
//! use foundry_models::Startup;
//!
//! let store = Store::open("/home/user/.foundry/state").unwrap();
//!
//! // Insert a startup
//! let startup = Startup::new("Acme", "acme");
//! let id = startup.id.clone();
//! store
//!     .transaction(|db| {
//!         db.insert_startup(startup);
//!         Ok::<_, PersistenceError>(())
//!     })
//!     .unwrap();
//!
//! // Read it back
//! let slug = store.read(|db| db.startup(&id).map(|s| s.slug.clone())).unwrap();
//! ```

pub mod database;
pub mod error;
pub mod store;

pub use database::Database;
pub use error::{PersistenceError, Result};
pub use store::Store;
