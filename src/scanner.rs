//! Backup inventory: scanning search directories into a sorted catalog
use crate::backup::{has_backup_extension, search_directories, BackupFile, BackupLocations};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Scanner-related errors
#[derive(Debug, Error)]
pub enum ScannerError {
    /// A search directory exists but could not be listed
    #[error("failed to read backup directory {}: {source}", path.display())]
    ReadDirectory {
        /// The directory that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

/// Builds the backup catalog from a list of search directories
pub struct BackupScanner {
    /// Directories to scan, in order
    directories: Vec<PathBuf>,
}

impl BackupScanner {
    /// Create a scanner over explicit directories
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            directories: directories
                .into_iter()
                .map(|dir| dir.as_ref().to_path_buf())
                .collect(),
        }
    }

    /// Create a scanner over the search directories of a configuration
    #[must_use]
    pub fn for_locations(locations: Option<&dyn BackupLocations>) -> Self {
        Self {
            directories: search_directories(locations),
        }
    }

    /// Directories this scanner will visit
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Scan every directory and return the catalog, newest first.
    ///
    /// Missing directories are skipped. Entries that cannot be inspected
    /// are skipped. Any other failure to list a directory aborts the scan.
    /// Ties on modification time are broken by ascending name so the order
    /// never depends on the order the OS lists entries in.
    pub fn scan(&self) -> Result<Vec<BackupFile>, ScannerError> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for dir in &self.directories {
            for file in scan_directory(dir)? {
                if seen.insert(file.path.clone()) {
                    files.push(file);
                } else {
                    debug!("Ignoring duplicate backup path {}", file.path.display());
                }
            }
        }

        files.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!(
            "Found {} backup(s) in {} director(ies)",
            files.len(),
            self.directories.len()
        );
        Ok(files)
    }
}

/// Scan the directories of a configuration in one call
pub fn list_backups(locations: Option<&dyn BackupLocations>) -> Result<Vec<BackupFile>, ScannerError> {
    BackupScanner::for_locations(locations).scan()
}

fn scan_directory(dir: &Path) -> Result<Vec<BackupFile>, ScannerError> {
    let read_error = |source: io::Error| ScannerError::ReadDirectory {
        path: dir.to_path_buf(),
        source,
    };

    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            return Err(read_error(io::Error::other(format!(
                "{} is not a directory",
                dir.display()
            ))));
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("Backup directory {} does not exist, skipping", dir.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(read_error(err)),
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 || err.path() == Some(dir) => {
                let source = io::Error::from(err);
                if source.kind() == io::ErrorKind::NotFound {
                    debug!("Backup directory {} disappeared, skipping", dir.display());
                    return Ok(Vec::new());
                }
                return Err(read_error(source));
            }
            Err(err) => {
                debug!("Skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !has_backup_extension(&name) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!("Skipping {}: {}", entry.path().display(), err);
                continue;
            }
        };
        let modified = match metadata.modified() {
            Ok(time) => DateTime::<Utc>::from(time),
            Err(err) => {
                debug!("Skipping {}: {}", entry.path().display(), err);
                continue;
            }
        };

        files.push(BackupFile {
            name,
            path: dir.join(entry.file_name()),
            directory: dir.to_path_buf(),
            size_bytes: metadata.len(),
            modified,
        });
    }

    Ok(files)
}
