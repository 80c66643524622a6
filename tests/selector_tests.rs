use chrono::{TimeZone, Utc};
use dbstash::selector::{filter_backups, find_by_name, resolve_backup_path, suggest_default};
use dbstash::{BackupFile, BackupScanner, DbStashError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn entry(name: &str, modified_secs: i64) -> BackupFile {
    let directory = PathBuf::from("/var/backups/dbstash");
    BackupFile {
        name: name.to_string(),
        path: directory.join(name),
        directory,
        size_bytes: 42,
        modified: Utc.timestamp_opt(modified_secs, 0).unwrap(),
    }
}

/// Newest first, as the scanner produces it
fn catalog() -> Vec<BackupFile> {
    vec![
        entry("feature-x_20260220_090000.backup", 600),
        entry("dev_20260219_100000.backup", 500),
        entry("prod_20260218_120000.backup", 400),
        entry("dev.backup", 300),
        entry("prod.backup", 200),
        entry("prod_20260215_143000.backup", 100),
    ]
}

fn names(files: &[BackupFile]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_find_by_name_ignores_case() {
    let catalog = catalog();
    let found = find_by_name(&catalog, "PROD.BACKUP").unwrap();
    assert_eq!(found.name, "prod.backup");
    assert!(find_by_name(&catalog, "prod").is_none());
}

#[test]
fn test_suggest_exact_match_wins_over_prefix() {
    let catalog = catalog();
    let chosen = suggest_default(&catalog, Some("dev.backup"), Some("dev")).unwrap();
    assert_eq!(chosen.name, "dev.backup");
}

#[test]
fn test_suggest_newest_with_prefix() {
    let catalog = catalog();
    let chosen = suggest_default(&catalog, Some("missing.backup"), Some("prod")).unwrap();
    assert_eq!(chosen.name, "prod_20260218_120000.backup");

    let folded = suggest_default(&catalog, None, Some("PROD")).unwrap();
    assert_eq!(folded.name, "prod_20260218_120000.backup");
}

#[test]
fn test_suggest_falls_back_to_newest_overall() {
    let catalog = catalog();
    let chosen = suggest_default(&catalog, Some("missing.backup"), Some("staging")).unwrap();
    assert_eq!(chosen.name, "feature-x_20260220_090000.backup");

    let no_hints = suggest_default(&catalog, None, None).unwrap();
    assert_eq!(no_hints.name, "feature-x_20260220_090000.backup");
}

#[test]
fn test_filter_empty_query_returns_copy() {
    let catalog = catalog();
    let mut all = filter_backups(&catalog, "   ");
    assert_eq!(all, catalog);

    all.clear();
    assert_eq!(catalog.len(), 6);
}

#[test]
fn test_filter_environment_aliases() {
    let catalog = catalog();

    let dev = filter_backups(&catalog, "development");
    assert_eq!(names(&dev), vec!["dev_20260219_100000.backup", "dev.backup"]);
    assert_eq!(filter_backups(&catalog, "DEV"), dev);

    let prod = filter_backups(&catalog, "production");
    assert_eq!(
        names(&prod),
        vec![
            "prod_20260218_120000.backup",
            "prod.backup",
            "prod_20260215_143000.backup"
        ]
    );
    assert_eq!(filter_backups(&catalog, "prod"), prod);
}

#[test]
fn test_filter_exact_filename() {
    let catalog = catalog();
    let exact = filter_backups(&catalog, "PROD.BACKUP");
    assert_eq!(names(&exact), vec!["prod.backup"]);

    assert!(filter_backups(&catalog, "prod_2026.backup").is_empty());
}

#[test]
fn test_filter_prefix() {
    let catalog = catalog();
    let feature = filter_backups(&catalog, "Feature");
    assert_eq!(names(&feature), vec!["feature-x_20260220_090000.backup"]);

    let dated = filter_backups(&catalog, "prod_202602");
    assert_eq!(
        names(&dated),
        vec!["prod_20260218_120000.backup", "prod_20260215_143000.backup"]
    );

    assert!(filter_backups(&catalog, "staging").is_empty());
}

#[test]
fn test_resolve_bare_name_from_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let stored = temp_dir.path().join("prod_20260215_143000.backup");
    fs::write(&stored, "PGDMP").unwrap();

    let catalog = BackupScanner::new([temp_dir.path()]).scan().unwrap();

    let resolved = resolve_backup_path("prod_20260215_143000.backup", &catalog).unwrap();
    assert_eq!(resolved, stored);

    let upper = resolve_backup_path("  PROD_20260215_143000.BACKUP ", &catalog).unwrap();
    assert_eq!(upper, stored);
}

#[test]
fn test_resolve_existing_path_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let stored = temp_dir.path().join("dev.backup");
    fs::write(&stored, "PGDMP").unwrap();

    let catalog = BackupScanner::new([temp_dir.path()]).scan().unwrap();
    let token = stored.to_string_lossy().into_owned();
    assert_eq!(resolve_backup_path(&token, &catalog).unwrap(), stored);
}

#[test]
fn test_resolve_explicit_path_wins_over_catalog() {
    let scanned = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    fs::write(scanned.path().join("prod.backup"), "scanned").unwrap();
    let explicit = elsewhere.path().join("prod.backup");
    fs::write(&explicit, "explicit").unwrap();

    let catalog = BackupScanner::new([scanned.path()]).scan().unwrap();
    let resolved = resolve_backup_path(&explicit.to_string_lossy(), &catalog).unwrap();
    assert_eq!(resolved, explicit);
}

#[test]
fn test_resolve_unknown_name_fails() {
    let catalog = catalog();
    let err = resolve_backup_path("nope_20990101_000000.backup", &catalog).unwrap_err();
    assert!(matches!(err, DbStashError::BackupNotFound { ref name } if name == "nope_20990101_000000.backup"));
    assert!(err.to_string().contains("backup file not found"));
}

#[test]
fn test_resolve_missing_path_is_not_looked_up_by_name() {
    let catalog = catalog();
    let err = resolve_backup_path("some/dir/prod.backup", &catalog).unwrap_err();
    assert!(matches!(err, DbStashError::BackupNotFound { .. }));
}

#[test]
fn test_resolve_blank_token() {
    let err = resolve_backup_path("", &catalog()).unwrap_err();
    assert!(matches!(err, DbStashError::BackupNotProvided));
    assert_eq!(err.to_string(), "backup file not provided");
}
