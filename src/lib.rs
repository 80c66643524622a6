//! `dbstash` - backup and migration bookkeeping for hosted Postgres projects
//!
//! This library finds local `pg_dump` archives, picks the right one for a
//! restore, resolves connection strings per environment and reconciles
//! local migration files against the remote migration history.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/// Backup files, search directories and filename convention
pub mod backup;
/// Command line interface definitions
pub mod cli;
/// Command handlers
pub mod commands;
/// Configuration management for dbstash
pub mod config;
pub mod connection;
pub mod environment;
/// Error types
pub mod error;
pub mod migration;
/// Backup inventory scanning
pub mod scanner;
pub mod selector;
pub mod tools;

pub use backup::BackupFile;
pub use config::Config;
pub use connection::{parse_connection_url, ConnectionParams};
pub use environment::Environment;
pub use error::DbStashError;
pub use scanner::BackupScanner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
