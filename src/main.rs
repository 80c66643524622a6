use dbstash::cli::{Cli, Commands};
use dbstash::commands::restore::RestoreRequest;
use dbstash::commands::{backups, connection, dump, migrations, restore};
use dbstash::Config;
use std::process;
use tracing_subscriber::EnvFilter;

// Allow println in main CLI binary
#[allow(clippy::disallowed_methods)]
fn main() {
    init_logging();

    let cli = Cli::parse();
    tracing::info!("dbstash CLI initialized");

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::disallowed_methods)]
fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        println!("dbstash - Use --help for available commands");
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let config = Config::discover(&cwd)?;
    if config.is_none() {
        tracing::debug!("No dbstash.toml in {}, using defaults", cwd.display());
    }
    let config = config.as_ref();

    match command {
        Commands::Backups { query, json } => backups::handle_backups(config, query.as_deref(), json),
        Commands::Dump {
            env,
            db_url,
            dry_run,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(dump::handle_dump(config, &env, db_url.as_deref(), dry_run))
                .map(|_| ())
        }
        Commands::Restore {
            env,
            backup,
            db_url,
            yes,
            clean,
            dry_run,
        } => {
            let request = RestoreRequest {
                env,
                backup,
                db_url,
                yes,
                clean,
                dry_run,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(restore::handle_restore(config, &request))
        }
        Commands::Migrations { input } => migrations::handle_migrations(config, input.as_deref()),
        Commands::Connection { env, db_url } => {
            connection::handle_connection(config, &env, db_url.as_deref())
        }
    }
}

/// Initialize logging based on environment variables
fn init_logging() {
    // Default to INFO level, can be overridden by RUST_LOG environment variable
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dbstash=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .init();
}
