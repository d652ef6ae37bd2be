//! Foundry command-line tools.
//!
//! Runs the HTTP API and moves record snapshots in and out of the store.

pub mod cli;
pub mod commands;
pub mod config;
