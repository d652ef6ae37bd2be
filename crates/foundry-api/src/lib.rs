//! REST API for Foundry.
//!
//! This crate exposes the timeline workflow over HTTP:
//! - Founder submission, editing and deletion of timeline events
//! - Visibility-aware event detail and startup timelines
//! - Staff verification, review, grading and feedback
//! - The coach review projection
//! - Community calendar registration and listing
//!
//! The acting founder and coach are read from the `X-Founder-Id` and
//! `X-Faculty-Id` headers.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use foundry_api::{serve, ApiConfig, AppState};
//! use foundry_persistence::Store;
//! use foundry_timeline::LogNotifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Store::open("/var/lib/foundry")?);
//!     let state = AppState::new(ApiConfig::default(), store, Arc::new(LogNotifier))?;
//!
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
