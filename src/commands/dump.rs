//! Dump command: capture an environment's database into a new backup

use crate::backup::{backup_filename, clean_path};
use crate::commands::resolve_params;
use crate::config::Config;
use crate::environment::backup_prefix_for;
use crate::tools::{self, dump_args, PgTool};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Directory new backups are written to
pub fn output_directory(config: Option<&Config>) -> Result<PathBuf> {
    let dir = match config {
        Some(config) => config.backup_dir_path(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    Ok(clean_path(&dir))
}

/// Handle the dump command, returning the path of the new backup
#[allow(clippy::disallowed_methods)]
pub async fn handle_dump(
    config: Option<&Config>,
    env: &str,
    db_url: Option<&str>,
    dry_run: bool,
) -> Result<PathBuf> {
    info!("Starting dump of environment: {}", env);
    let params = resolve_params(config, env, db_url)?;
    debug!(
        "Dump target: host={} port={} database={} user={}",
        params.host, params.port, params.database, params.user
    );

    let dir = output_directory(config)?;
    let filename = backup_filename(&backup_prefix_for(env), &Local::now().naive_local());
    let output = dir.join(filename);
    let args = dump_args(&params, &output);

    if dry_run {
        println!("✅ Dry run: would run pg_dump {}", args.join(" "));
        return Ok(output);
    }

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create backup directory {}", dir.display()))?;

    let bin_dir = config.and_then(Config::postgres_bin_dir);
    let program = tools::locate(PgTool::Dump, bin_dir.as_deref())?;
    tools::run(PgTool::Dump, &program, &args, &params.password).await?;

    info!("Backup written to {}", output.display());
    println!("✅ Backup written to {}", output.display());
    Ok(output)
}
