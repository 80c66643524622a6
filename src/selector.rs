//! Choosing a backup from the catalog
//!
//! All lookups here are case-insensitive on the filename and read-only over
//! the catalog, which is expected to be sorted newest first.

use crate::backup::{has_backup_extension, BackupFile};
use crate::environment::Environment;
use crate::error::{DbStashError, Result};
use std::path::{is_separator, PathBuf};

fn fold(text: &str) -> String {
    text.to_lowercase()
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// First entry whose name equals `name`, ignoring case
#[must_use]
pub fn find_by_name<'a>(catalog: &'a [BackupFile], name: &str) -> Option<&'a BackupFile> {
    let wanted = fold(name);
    catalog.iter().find(|file| fold(&file.name) == wanted)
}

/// First entry whose name starts with `prefix`, ignoring case
#[must_use]
pub fn find_by_prefix<'a>(catalog: &'a [BackupFile], prefix: &str) -> Option<&'a BackupFile> {
    let prefix = fold(prefix);
    catalog
        .iter()
        .find(|file| fold(&file.name).starts_with(&prefix))
}

/// Best default backup for a restore.
///
/// An exact filename match wins, then the newest entry starting with the
/// prefix hint, then the newest entry overall. `None` only when the catalog
/// is empty.
#[must_use]
pub fn suggest_default<'a>(
    catalog: &'a [BackupFile],
    exact: Option<&str>,
    prefix_hint: Option<&str>,
) -> Option<&'a BackupFile> {
    if let Some(file) = non_blank(exact).and_then(|name| find_by_name(catalog, name)) {
        return Some(file);
    }
    if let Some(prefix) = non_blank(prefix_hint) {
        if let Some(file) = find_by_prefix(catalog, prefix) {
            return Some(file);
        }
    }
    catalog.first()
}

/// Entries matching a typed query.
///
/// `prod`/`production` and `dev`/`development` select by environment
/// prefix, a query ending in `.backup` is an exact filename, anything else
/// is a name prefix. An empty query returns the whole catalog. The result
/// is always an owned copy.
#[must_use]
pub fn filter_backups(catalog: &[BackupFile], query: &str) -> Vec<BackupFile> {
    let query = query.trim();
    if query.is_empty() {
        return catalog.to_vec();
    }

    if let Some(env) = Environment::parse(query) {
        let prefix = env.backup_prefix();
        return catalog
            .iter()
            .filter(|file| fold(&file.name).starts_with(prefix))
            .cloned()
            .collect();
    }

    let folded = fold(query);
    if has_backup_extension(query) {
        return catalog
            .iter()
            .filter(|file| fold(&file.name) == folded)
            .cloned()
            .collect();
    }

    catalog
        .iter()
        .filter(|file| fold(&file.name).starts_with(&folded))
        .cloned()
        .collect()
}

/// Turn a user token into a concrete backup path.
///
/// A path that exists on disk is returned unchanged, so an explicit path
/// always beats a catalog entry of the same name. Otherwise a bare filename
/// is looked up in the catalog.
pub fn resolve_backup_path(token: &str, catalog: &[BackupFile]) -> Result<PathBuf> {
    let token = token.trim();
    if token.is_empty() {
        return Err(DbStashError::BackupNotProvided);
    }

    if std::fs::metadata(token).is_ok() {
        return Ok(PathBuf::from(token));
    }

    if !token.chars().any(is_separator) {
        if let Some(file) = find_by_name(catalog, token) {
            return Ok(file.path.clone());
        }
    }

    Err(DbStashError::BackupNotFound {
        name: token.to_string(),
    })
}
