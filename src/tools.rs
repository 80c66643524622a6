//! Postgres client tools
//!
//! `pg_dump` and `pg_restore` are treated as black boxes: this module finds
//! them, builds their argument lists and reports whether they succeeded.
//! Passwords are passed through `PGPASSWORD`, never on the command line.

use crate::connection::ConnectionParams;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors raised while locating or running a Postgres tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// The binary is neither in the hinted directory nor on `PATH`
    #[error("{tool} not found; install the Postgres client tools or set postgres.bin_dir")]
    NotFound {
        /// Tool that was looked up
        tool: PgTool,
    },

    /// The process could not be started
    #[error("failed to start {tool}: {source}")]
    Spawn {
        /// Tool that was started
        tool: PgTool,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully
    #[error("{tool} failed with {status}")]
    Failed {
        /// Tool that failed
        tool: PgTool,
        /// Exit status
        status: ExitStatus,
    },
}

/// Postgres client binaries used by dbstash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgTool {
    /// `pg_dump`
    Dump,
    /// `pg_restore`
    Restore,
    /// `psql`
    Psql,
}

impl PgTool {
    /// Executable name
    #[must_use]
    pub const fn binary_name(self) -> &'static str {
        match self {
            Self::Dump => "pg_dump",
            Self::Restore => "pg_restore",
            Self::Psql => "psql",
        }
    }
}

impl fmt::Display for PgTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Find a tool, preferring the configured binary directory over `PATH`
pub fn locate(tool: PgTool, bin_dir: Option<&Path>) -> Result<PathBuf, ToolError> {
    if let Some(dir) = bin_dir {
        let candidate = dir.join(tool.binary_name());
        if candidate.is_file() {
            debug!("Using {} from {}", tool, dir.display());
            return Ok(candidate);
        }
        debug!("{} not found in {}, falling back to PATH", tool, dir.display());
    }
    which::which(tool.binary_name()).map_err(|_| ToolError::NotFound { tool })
}

fn connection_args(params: &ConnectionParams) -> Vec<String> {
    let mut args = vec![
        "--host".to_string(),
        params.host.clone(),
        "--port".to_string(),
        params.port.to_string(),
    ];
    if !params.user.is_empty() {
        args.push("--username".to_string());
        args.push(params.user.clone());
    }
    args.push("--dbname".to_string());
    args.push(params.database.clone());
    args
}

/// Arguments for a custom-format `pg_dump` into `output`
#[must_use]
pub fn dump_args(params: &ConnectionParams, output: &Path) -> Vec<String> {
    let mut args = connection_args(params);
    args.extend([
        "--format=custom".to_string(),
        "--no-owner".to_string(),
        "--no-privileges".to_string(),
        "--file".to_string(),
        output.to_string_lossy().into_owned(),
    ]);
    args
}

/// Options for `pg_restore`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Drop objects before recreating them
    pub clean: bool,
}

/// Arguments for a `pg_restore` of `file`
#[must_use]
pub fn restore_args(params: &ConnectionParams, file: &Path, options: RestoreOptions) -> Vec<String> {
    let mut args = connection_args(params);
    args.push("--no-owner".to_string());
    args.push("--no-privileges".to_string());
    if options.clean {
        args.push("--clean".to_string());
        args.push("--if-exists".to_string());
    }
    args.push(file.to_string_lossy().into_owned());
    args
}

/// Run a tool to completion, inheriting stdio
pub async fn run(
    tool: PgTool,
    program: &Path,
    args: &[String],
    password: &str,
) -> Result<(), ToolError> {
    info!("Running {} {}", program.display(), args.join(" "));

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if !password.is_empty() {
        command.env("PGPASSWORD", password);
    }

    let status = command
        .status()
        .await
        .map_err(|source| ToolError::Spawn { tool, source })?;

    if status.success() {
        Ok(())
    } else {
        Err(ToolError::Failed { tool, status })
    }
}
