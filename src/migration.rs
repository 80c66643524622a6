//! Reconciling local migration files against the remote migration history
//!
//! The hosting CLI prints its migration list as a pipe-delimited table:
//!
//! ```text
//!    Local          | Remote         | Time (UTC)
//!   ----------------|----------------|---------------------
//!    20260215035000 | 20260215035000 | 2026-02-15 03:50:00
//!    20260216120000 |                | 2026-02-16 12:00:00
//! ```
//!
//! This module parses that text and maps each row back to a local file.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Placeholder shown when no local file matches a row
pub const NO_LOCAL_FILE: &str = "-";

/// One `(local, remote)` pair from the migration listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MigrationListRow {
    /// Local timestamp token, empty when the migration is not on disk
    pub local: String,
    /// Remote timestamp token, empty when the migration is not applied remotely
    pub remote: String,
}

/// Parse the tabular migration listing into rows, in order of appearance.
///
/// Blank lines, separator lines, the header line, lines with fewer than
/// two cells and rows with neither a local nor a remote token are skipped
/// rather than reported.
#[must_use]
pub fn parse_migration_rows(text: &str) -> Vec<MigrationListRow> {
    let mut rows = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() || is_separator_line(line) {
            continue;
        }

        let mut cells = line.split('|');
        let (Some(local), Some(remote)) = (cells.next(), cells.next()) else {
            continue;
        };
        let (local, remote) = (local.trim(), remote.trim());

        if is_header(local, remote) || (local.is_empty() && remote.is_empty()) {
            continue;
        }

        rows.push(MigrationListRow {
            local: local.to_string(),
            remote: remote.to_string(),
        });
    }

    rows
}

fn is_separator_line(line: &str) -> bool {
    line.chars()
        .all(|c| c == '-' || c == '|' || c.is_whitespace())
}

fn is_header(local: &str, remote: &str) -> bool {
    local.eq_ignore_ascii_case("local") && remote.eq_ignore_ascii_case("remote")
}

/// Leading timestamp token of a migration filename.
///
/// Everything before the first `_`, or before the first `.` when there is
/// no underscore, or the whole name.
#[must_use]
pub fn migration_timestamp(filename: &str) -> &str {
    if let Some((stamp, _)) = filename.split_once('_') {
        return stamp;
    }
    if let Some((stamp, _)) = filename.split_once('.') {
        return stamp;
    }
    filename
}

/// Timestamp token to local filename lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationFilenameIndex {
    files: HashMap<String, String>,
}

impl MigrationFilenameIndex {
    /// Index filenames by their timestamp token.
    ///
    /// When two files share a token the later one replaces the earlier.
    pub fn from_filenames<I, S>(filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files = HashMap::new();
        for filename in filenames {
            let filename = filename.into();
            let key = migration_timestamp(&filename).to_string();
            if let Some(previous) = files.insert(key, filename.clone()) {
                warn!(
                    "Migration files {} and {} share a timestamp; using {}",
                    previous, filename, filename
                );
            }
        }
        Self { files }
    }

    /// Filename for a timestamp token
    #[must_use]
    pub fn get(&self, timestamp: &str) -> Option<&str> {
        self.files.get(timestamp).map(String::as_str)
    }

    /// Number of indexed files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Local file a row refers to, or [`NO_LOCAL_FILE`].
    ///
    /// The local token is tried first, then the remote one.
    #[must_use]
    pub fn file_for_row(&self, row: &MigrationListRow) -> &str {
        [row.local.as_str(), row.remote.as_str()]
            .into_iter()
            .filter(|token| !token.is_empty())
            .find_map(|token| self.get(token))
            .unwrap_or(NO_LOCAL_FILE)
    }
}

/// Sync state of one migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    /// Present locally and applied remotely
    Synced,
    /// Present locally, not applied remotely
    LocalOnly,
    /// Applied remotely, not present locally
    RemoteOnly,
}

impl MigrationStatus {
    /// Status implied by which sides of a row are populated
    #[must_use]
    pub fn of(row: &MigrationListRow) -> Self {
        match (row.local.is_empty(), row.remote.is_empty()) {
            (false, false) => Self::Synced,
            (false, true) => Self::LocalOnly,
            _ => Self::RemoteOnly,
        }
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Synced => "synced",
            Self::LocalOnly => "local only",
            Self::RemoteOnly => "remote only",
        })
    }
}

/// A listing row joined with its local file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledMigration {
    /// Local timestamp token
    pub local: String,
    /// Remote timestamp token
    pub remote: String,
    /// Matching local filename or [`NO_LOCAL_FILE`]
    pub file: String,
    /// Sync state
    pub status: MigrationStatus,
}

/// Join every row with its local file, preserving row order
#[must_use]
pub fn reconcile(
    rows: &[MigrationListRow],
    index: &MigrationFilenameIndex,
) -> Vec<ReconciledMigration> {
    rows.iter()
        .map(|row| ReconciledMigration {
            local: row.local.clone(),
            remote: row.remote.clone(),
            file: index.file_for_row(row).to_string(),
            status: MigrationStatus::of(row),
        })
        .collect()
}

/// Render reconciled rows as an aligned text table
#[must_use]
pub fn render_table(rows: &[ReconciledMigration]) -> String {
    const HEADERS: [&str; 4] = ["LOCAL", "REMOTE", "STATUS", "FILE"];

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.local.clone(),
                row.remote.clone(),
                row.status.to_string(),
                row.file.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut table = format_table_line(&HEADERS, &widths);
    table.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    table.push_str(&rule.join("-|-"));
    table.push('\n');
    for line in &cells {
        table.push_str(&format_table_line(line, &widths));
        table.push('\n');
    }
    table
}

fn format_table_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    padded.join(" | ").trim_end().to_string()
}

/// `.sql` filenames in the migrations directory, sorted.
///
/// A missing directory yields an empty list.
pub fn list_local_migrations(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("Migrations directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_file && name.to_lowercase().ends_with(".sql") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
