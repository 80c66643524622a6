//! Connection command: show how an environment's URL was understood

use crate::commands::resolve_params;
use crate::config::Config;
use anyhow::Result;
use tracing::debug;

/// Handle the connection command
#[allow(clippy::disallowed_methods)]
pub fn handle_connection(config: Option<&Config>, env: &str, db_url: Option<&str>) -> Result<()> {
    debug!("Resolving connection for environment: {}", env);
    let params = resolve_params(config, env, db_url)?;

    println!("🔗 {env}");
    println!("   Host:        {}:{}", params.host, params.port);
    println!("   Database:    {}", params.database);
    println!("   User:        {}", params.user);
    println!("   Password:    {}", params.masked_password());
    Ok(())
}
