//! Backup files and where to look for them
//!
//! A backup is a `pg_dump` custom-format archive named
//! `<prefix>_<YYYYMMDD>_<HHMMSS>.backup`. Backups live in the configured
//! backup directory, but older projects keep them at the project root, so
//! both places are searched.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// File extension of backup archives, without the dot
pub const BACKUP_EXTENSION: &str = "backup";

/// One discovered backup archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupFile {
    /// Base filename, case preserved
    pub name: String,
    /// Absolute path, unique within a catalog
    pub path: PathBuf,
    /// Absolute directory the file was found in
    pub directory: PathBuf,
    /// Size of the file in bytes
    pub size_bytes: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl BackupFile {
    /// Prefix and capture time encoded in the filename, if it follows the convention
    #[must_use]
    pub fn parsed_name(&self) -> Option<BackupName> {
        parse_backup_filename(&self.name)
    }
}

/// Components of a conventional backup filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupName {
    /// Lower-cased environment or branch prefix
    pub prefix: String,
    /// Local time the dump was taken
    pub taken_at: NaiveDateTime,
}

/// Build the conventional filename for a new backup.
///
/// ```
/// use chrono::NaiveDate;
/// let at = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap().and_hms_opt(14, 30, 0).unwrap();
/// assert_eq!(dbstash::backup::backup_filename("Prod", &at), "prod_20260215_143000.backup");
/// ```
#[must_use]
pub fn backup_filename(prefix: &str, taken_at: &NaiveDateTime) -> String {
    format!(
        "{}_{}.{BACKUP_EXTENSION}",
        prefix.trim().to_lowercase(),
        taken_at.format("%Y%m%d_%H%M%S")
    )
}

fn backup_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?P<prefix>.+)_(?P<date>\d{8})_(?P<time>\d{6})\.backup$")
            .expect("backup filename pattern is valid")
    })
}

/// Split a conventional backup filename into prefix and capture time
#[must_use]
pub fn parse_backup_filename(name: &str) -> Option<BackupName> {
    let caps = backup_name_pattern().captures(name.trim())?;
    let stamp = format!("{}{}", &caps["date"], &caps["time"]);
    let taken_at = NaiveDateTime::parse_from_str(&stamp, "%Y%m%d%H%M%S").ok()?;
    Some(BackupName {
        prefix: caps["prefix"].to_lowercase(),
        taken_at,
    })
}

/// Whether a filename carries the backup extension, ignoring case
#[must_use]
pub fn has_backup_extension(name: &str) -> bool {
    name.to_lowercase().ends_with(".backup")
}

/// Source of the directories backups may live in
pub trait BackupLocations {
    /// Configured backup directory; may be relative, `.` or blank
    fn backup_directory(&self) -> String;
    /// Project root directory
    fn project_root(&self) -> String;
}

/// Ordered, deduplicated absolute directories to scan for backups.
///
/// The backup directory comes first, then the project root. Without
/// configuration the current working directory is the only candidate.
#[must_use]
pub fn search_directories(locations: Option<&dyn BackupLocations>) -> Vec<PathBuf> {
    let Some(locations) = locations else {
        return std::env::current_dir()
            .map(|cwd| vec![clean_path(&cwd)])
            .unwrap_or_default();
    };

    let mut dirs: Vec<PathBuf> = Vec::new();
    for raw in [locations.backup_directory(), locations.project_root()] {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let dir = absolutize(raw);
        if dirs.contains(&dir) {
            debug!("Skipping duplicate search directory {}", dir.display());
            continue;
        }
        dirs.push(dir);
    }
    dirs
}

/// Resolve against the working directory, falling back to lexical cleanup
fn absolutize(raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        return clean_path(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => clean_path(&cwd.join(path)),
        Err(_) => clean_path(path),
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` where possible
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("../x/./y")), PathBuf::from("../x/y"));
    }

    #[test]
    fn test_parse_backup_filename() {
        let parsed = parse_backup_filename("PROD_20260215_143000.BACKUP").unwrap();
        assert_eq!(parsed.prefix, "prod");
        assert_eq!(
            parsed.taken_at,
            NaiveDate::from_ymd_opt(2026, 2, 15)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
        );

        let branch = parse_backup_filename("feature_login_20260101_000000.backup").unwrap();
        assert_eq!(branch.prefix, "feature_login");

        assert!(parse_backup_filename("prod.backup").is_none());
        assert!(parse_backup_filename("prod_20261399_000000.backup").is_none());
    }

    #[test]
    fn test_has_backup_extension() {
        assert!(has_backup_extension("a.backup"));
        assert!(has_backup_extension("A.BACKUP"));
        assert!(!has_backup_extension("a.backup.sql"));
        assert!(!has_backup_extension("backup"));
    }
}
