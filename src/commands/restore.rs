//! Restore command: load a backup into an environment's database

use crate::backup::{BackupFile, BackupLocations};
use crate::commands::resolve_params;
use crate::config::Config;
use crate::environment::{backup_prefix_for, Environment};
use crate::error::{DbStashError, Result as StashResult};
use crate::scanner::list_backups;
use crate::selector::{resolve_backup_path, suggest_default};
use crate::tools::{self, restore_args, PgTool, RestoreOptions};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Options of a restore run
#[derive(Debug, Clone, Default)]
pub struct RestoreRequest {
    /// Target environment
    pub env: String,
    /// Backup filename or path typed by the user
    pub backup: Option<String>,
    /// Connection URL override
    pub db_url: Option<String>,
    /// Confirmation for production targets
    pub yes: bool,
    /// Drop existing objects first
    pub clean: bool,
    /// Print the plan only
    pub dry_run: bool,
}

/// Pick the backup file for a restore.
///
/// An explicit token goes through path resolution; otherwise the newest
/// backup for the environment's prefix is suggested.
pub fn select_backup(catalog: &[BackupFile], env: &str, token: Option<&str>) -> StashResult<PathBuf> {
    if let Some(token) = explicit_token(token) {
        return resolve_backup_path(token, catalog);
    }

    let prefix = backup_prefix_for(env);
    suggest_default(catalog, None, Some(&prefix))
        .map(|file| file.path.clone())
        .ok_or_else(|| DbStashError::BackupNotFound {
            name: format!("{prefix}_*.backup"),
        })
}

fn explicit_token(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|t| !t.is_empty())
}

/// Refuse production restores that were not confirmed with `--yes`
pub fn ensure_confirmed(env: &str, yes: bool) -> StashResult<()> {
    if Environment::parse(env) == Some(Environment::Production) && !yes {
        return Err(DbStashError::ProductionRestoreNotConfirmed);
    }
    Ok(())
}

/// Handle the restore command
#[allow(clippy::disallowed_methods)]
pub async fn handle_restore(config: Option<&Config>, request: &RestoreRequest) -> Result<()> {
    info!("Starting restore into environment: {}", request.env);

    let catalog = list_backups(config.map(|c| c as &dyn BackupLocations))?;
    let backup = select_backup(&catalog, &request.env, request.backup.as_deref())?;
    debug!("Selected backup {}", backup.display());

    if explicit_token(request.backup.as_deref()).is_none() {
        let expected = backup_prefix_for(&request.env);
        let matches_prefix = backup
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase().starts_with(&expected))
            .unwrap_or(false);
        if !matches_prefix {
            warn!(
                "No backup with prefix '{}' found, falling back to newest backup {}",
                expected,
                backup.display()
            );
        }
    }

    let params = resolve_params(config, &request.env, request.db_url.as_deref())?;
    let options = RestoreOptions {
        clean: request.clean,
    };
    let args = restore_args(&params, &backup, options);

    println!("🔄 Restore plan");
    println!("   Backup:      {}", backup.display());
    println!("   Target:      {}:{}/{}", params.host, params.port, params.database);
    println!("   Environment: {}", request.env);
    println!("   Clean:       {}", if request.clean { "YES" } else { "NO" });

    if request.dry_run {
        println!("✅ Dry run: would run pg_restore {}", args.join(" "));
        return Ok(());
    }

    ensure_confirmed(&request.env, request.yes)?;

    let bin_dir = config.and_then(Config::postgres_bin_dir);
    let program = tools::locate(PgTool::Restore, bin_dir.as_deref())?;
    tools::run(PgTool::Restore, &program, &args, &params.password).await?;

    info!("Restore into {} completed", request.env);
    println!("✅ Restored {} into {}", backup.display(), request.env);
    Ok(())
}
