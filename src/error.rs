use crate::config::ConfigError;
use crate::connection::ConnectionError;
use crate::scanner::ScannerError;
use crate::tools::ToolError;
use thiserror::Error;

/// Custom error types for `dbstash`
#[derive(Error, Debug)]
pub enum DbStashError {
    /// No backup token was given
    #[error("backup file not provided")]
    BackupNotProvided,

    /// The token matched neither a file on disk nor a catalog entry
    #[error("backup file not found: {name}")]
    BackupNotFound {
        /// The token as typed
        name: String,
    },

    /// Restoring into production needs an explicit confirmation flag
    #[error("refusing to restore into production without --yes")]
    ProductionRestoreNotConfirmed,

    /// Connection URL error wrapper
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Backup scanning error wrapper
    #[error(transparent)]
    Scanner(#[from] ScannerError),

    /// Configuration error wrapper
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External tool error wrapper
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for `dbstash` operations
pub type Result<T> = std::result::Result<T, DbStashError>;
