//! Search directory resolution and backup filename convention

use chrono::NaiveDate;
use dbstash::backup::{backup_filename, parse_backup_filename, search_directories, BackupLocations};
use dbstash::environment::backup_prefix_for;
use std::path::PathBuf;
use tempfile::TempDir;

struct Locations {
    backup_dir: String,
    project_root: String,
}

impl BackupLocations for Locations {
    fn backup_directory(&self) -> String {
        self.backup_dir.clone()
    }

    fn project_root(&self) -> String {
        self.project_root.clone()
    }
}

fn dirs_for(backup_dir: &str, project_root: &str) -> Vec<PathBuf> {
    let locations = Locations {
        backup_dir: backup_dir.to_string(),
        project_root: project_root.to_string(),
    };
    search_directories(Some(&locations as &dyn BackupLocations))
}

#[test]
fn test_same_directory_yields_single_entry() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_string_lossy().into_owned();

    let dirs = dirs_for(&root, &root);
    assert_eq!(dirs, vec![temp_dir.path().to_path_buf()]);

    let dotted = format!("{root}/./");
    assert_eq!(dirs_for(&dotted, &root), vec![temp_dir.path().to_path_buf()]);
}

#[test]
fn test_dot_backup_dir_matches_working_directory_root() {
    let cwd = std::env::current_dir().unwrap();
    let dirs = dirs_for(".", &cwd.to_string_lossy());
    assert_eq!(dirs, vec![cwd]);
}

#[test]
fn test_distinct_directories_keep_order() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let backups = root.join("backups");

    let dirs = dirs_for(&backups.to_string_lossy(), &root.to_string_lossy());
    assert_eq!(dirs, vec![backups, root.to_path_buf()]);
    assert!(dirs.iter().all(|d| d.is_absolute()));
}

#[test]
fn test_relative_backup_dir_is_made_absolute() {
    let cwd = std::env::current_dir().unwrap();
    let dirs = dirs_for("backups/../backups", "/srv/project");
    assert_eq!(dirs, vec![cwd.join("backups"), PathBuf::from("/srv/project")]);
}

#[test]
fn test_blank_directories_are_skipped() {
    assert_eq!(dirs_for("   ", "/srv/project"), vec![PathBuf::from("/srv/project")]);
    assert!(dirs_for("", "").is_empty());
}

#[test]
fn test_no_configuration_uses_working_directory() {
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(search_directories(None), vec![cwd]);
}

#[test]
fn test_backup_file_naming() {
    let taken_at = NaiveDate::from_ymd_opt(2026, 2, 15)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();

    assert_eq!(
        backup_filename("prod", &taken_at),
        "prod_20260215_143000.backup"
    );
    assert_eq!(
        backup_filename(&backup_prefix_for("Development"), &taken_at),
        "dev_20260215_143000.backup"
    );

    let parsed = parse_backup_filename(&backup_filename("Feature-X", &taken_at)).unwrap();
    assert_eq!(parsed.prefix, "feature-x");
    assert_eq!(parsed.taken_at, taken_at);
}
