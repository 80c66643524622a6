//! Backup listing command

use crate::backup::{BackupFile, BackupLocations};
use crate::config::Config;
use crate::scanner::BackupScanner;
use crate::selector::filter_backups;
use anyhow::Result;
use tracing::{debug, info};

/// Handle the backups command
#[allow(clippy::disallowed_methods)]
pub fn handle_backups(config: Option<&Config>, query: Option<&str>, json: bool) -> Result<()> {
    let scanner = BackupScanner::for_locations(config.map(|c| c as &dyn BackupLocations));
    debug!("Searching for backups in {:?}", scanner.directories());

    let catalog = scanner.scan()?;
    let matches = filter_backups(&catalog, query.unwrap_or_default());
    info!(
        "{} of {} backup(s) match query {:?}",
        matches.len(),
        catalog.len(),
        query
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No backups found.");
        for dir in scanner.directories() {
            println!("   searched: {}", dir.display());
        }
        return Ok(());
    }

    println!("📦 Backups (newest first):");
    println!();
    print!("{}", format_backup_list(&matches));
    Ok(())
}

/// Render backups as an aligned listing
#[must_use]
pub fn format_backup_list(backups: &[BackupFile]) -> String {
    let name_width = backups
        .iter()
        .map(|b| b.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!(
        "{:<name_width$}  {:<8}  {:>10}  {:<19}  DIRECTORY\n",
        "NAME", "ENV", "SIZE", "MODIFIED"
    );
    for backup in backups {
        let env = backup
            .parsed_name()
            .map_or_else(|| "-".to_string(), |parsed| parsed.prefix);
        out.push_str(&format!(
            "{:<name_width$}  {:<8}  {:>10}  {:<19}  {}\n",
            backup.name,
            env,
            human_size(backup.size_bytes),
            backup
                .modified
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S"),
            backup.directory.display()
        ));
    }
    out
}

/// Format a byte count with a binary unit
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
