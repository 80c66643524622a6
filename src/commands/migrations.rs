//! Migrations command: reconcile local files against the remote history

use crate::config::Config;
use crate::migration::{
    list_local_migrations, parse_migration_rows, reconcile, render_table, MigrationFilenameIndex,
    MigrationStatus, ReconciledMigration,
};
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reconcile listing text against the files in `migrations_dir`
pub fn reconcile_listing(text: &str, migrations_dir: &Path) -> Result<Vec<ReconciledMigration>> {
    let files = list_local_migrations(migrations_dir).with_context(|| {
        format!(
            "Failed to read migrations directory {}",
            migrations_dir.display()
        )
    })?;
    debug!(
        "Indexed {} local migration file(s) from {}",
        files.len(),
        migrations_dir.display()
    );

    let index = MigrationFilenameIndex::from_filenames(files);
    let rows = parse_migration_rows(text);
    Ok(reconcile(&rows, &index))
}

/// Handle the migrations command
#[allow(clippy::disallowed_methods)]
pub fn handle_migrations(config: Option<&Config>, input: Option<&Path>) -> Result<()> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read migration list from {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read migration list from stdin")?;
            text
        }
    };

    let migrations_dir = config.map_or_else(
        || PathBuf::from(crate::config::MigrationsConfig::default().directory),
        Config::migrations_dir_path,
    );
    let reconciled = reconcile_listing(&text, &migrations_dir)?;
    info!("Reconciled {} migration row(s)", reconciled.len());

    if reconciled.is_empty() {
        println!("No migrations found in the input.");
        return Ok(());
    }

    print!("{}", render_table(&reconciled));

    let count = |status: MigrationStatus| reconciled.iter().filter(|m| m.status == status).count();
    println!();
    println!(
        "{} synced, {} local only, {} remote only",
        count(MigrationStatus::Synced),
        count(MigrationStatus::LocalOnly),
        count(MigrationStatus::RemoteOnly)
    );
    Ok(())
}
