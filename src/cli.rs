use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI interface for `dbstash`
#[derive(Parser)]
#[command(name = "dbstash")]
#[command(version = crate::VERSION)]
#[command(about = "dbstash - Postgres backups and migration bookkeeping across environments")]
#[command(
    long_about = "Find, take and restore pg_dump backups for production, development and branch databases, and reconcile local migrations with the remote history"
)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List local backups, newest first
    Backups {
        /// Filter: prod, dev, a name prefix or an exact filename
        #[arg(value_name = "QUERY")]
        query: Option<String>,
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump an environment's database into the backup directory
    Dump {
        /// Environment name (production, development or a branch)
        #[arg(value_name = "ENV")]
        env: String,
        /// Connection URL overriding the configuration
        #[arg(long, value_name = "URL")]
        db_url: Option<String>,
        /// Show what would run without running it
        #[arg(long)]
        dry_run: bool,
    },
    /// Restore a backup into an environment's database
    Restore {
        /// Target environment name
        #[arg(value_name = "ENV")]
        env: String,
        /// Backup filename or path; defaults to the newest backup for ENV
        #[arg(value_name = "BACKUP")]
        backup: Option<String>,
        /// Connection URL overriding the configuration
        #[arg(long, value_name = "URL")]
        db_url: Option<String>,
        /// Confirm restoring into production
        #[arg(long, short = 'y')]
        yes: bool,
        /// Drop existing objects before restoring
        #[arg(long)]
        clean: bool,
        /// Show what would run without running it
        #[arg(long)]
        dry_run: bool,
    },
    /// Reconcile local migration files with the remote migration list
    Migrations {
        /// File containing the migration list output; reads stdin when omitted
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Show the connection parameters of an environment
    Connection {
        /// Environment name
        #[arg(value_name = "ENV")]
        env: String,
        /// Connection URL overriding the configuration
        #[arg(long, value_name = "URL")]
        db_url: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
