use crate::config::Config;
use crate::connection::{parse_connection_url, resolve_database_url, ConnectionParams};
use crate::error::Result;

/// Backups listing command functionality
pub mod backups;
/// Connection command functionality
pub mod connection;
/// Dump command functionality
pub mod dump;
/// Migrations command functionality
pub mod migrations;
/// Restore command functionality
pub mod restore;

/// Connection parameters for an environment, honoring a `--db-url` override
pub fn resolve_params(
    config: Option<&Config>,
    env: &str,
    db_url: Option<&str>,
) -> Result<ConnectionParams> {
    let env_config = config.and_then(|c| c.environment(env));
    let url = resolve_database_url(db_url, env, env_config, |var| std::env::var(var).ok())?;
    Ok(parse_connection_url(&url)?)
}
