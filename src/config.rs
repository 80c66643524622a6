use crate::backup::BackupLocations;
use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "dbstash.toml";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error occurred while reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error occurred
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure for dbstash
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Project configuration
    #[serde(default)]
    pub project: ProjectConfig,
    /// Local backup storage
    #[serde(default)]
    pub backup: BackupConfig,
    /// Postgres client tool discovery
    #[serde(default)]
    pub postgres: PostgresConfig,
    /// Local migration files
    #[serde(default)]
    pub migrations: MigrationsConfig,
    /// Environment-specific connection settings
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
    /// Directory the configuration was loaded from
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

/// Project configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProjectConfig {
    /// Project root, relative to the configuration file
    pub root: Option<String>,
    /// Hosted project reference
    #[serde(rename = "ref")]
    pub project_ref: Option<String>,
}

/// Backup storage configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackupConfig {
    /// Directory backups are written to and searched in first
    #[serde(default = "default_backup_directory")]
    pub directory: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: default_backup_directory(),
        }
    }
}

fn default_backup_directory() -> String {
    ".".to_string()
}

/// Postgres client tool hints
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PostgresConfig {
    /// Directory containing `pg_dump`, `pg_restore` and `psql`
    pub bin_dir: Option<String>,
}

/// Migration files configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MigrationsConfig {
    /// Directory holding `<timestamp>_<name>.sql` files
    #[serde(default = "default_migrations_directory")]
    pub directory: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            directory: default_migrations_directory(),
        }
    }
}

fn default_migrations_directory() -> String {
    "supabase/migrations".to_string()
}

/// Connection settings for one environment
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Inline connection URL
    pub url: Option<String>,
    /// Environment variable containing the connection URL
    pub url_env: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.config_dir = path.parent().map(|dir| {
            if dir.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                dir.to_path_buf()
            }
        });
        Ok(config)
    }

    /// Load `dbstash.toml` from `dir` if it exists
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Option<Self>, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    /// Look up an environment by exact key, then by its known aliases
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        let name = name.trim();
        if let Some(env) = self.environments.get(name) {
            return Some(env);
        }
        let known = Environment::parse(name)?;
        known
            .aliases()
            .iter()
            .find_map(|alias| self.environments.get(*alias))
    }

    /// Absolute-or-relative project root as a path
    #[must_use]
    pub fn project_root_path(&self) -> PathBuf {
        let base = self
            .config_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        match self.project.root.as_deref().map(str::trim) {
            Some(root) if !root.is_empty() => base.join(root),
            _ => base,
        }
    }

    /// Backup directory, joined onto the project root when relative
    #[must_use]
    pub fn backup_dir_path(&self) -> PathBuf {
        self.project_root_path().join(self.backup.directory.trim())
    }

    /// Migrations directory, joined onto the project root when relative
    #[must_use]
    pub fn migrations_dir_path(&self) -> PathBuf {
        self.project_root_path().join(self.migrations.directory.trim())
    }

    /// Configured Postgres binary directory
    #[must_use]
    pub fn postgres_bin_dir(&self) -> Option<PathBuf> {
        self.postgres
            .bin_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}

impl BackupLocations for Config {
    fn backup_directory(&self) -> String {
        if self.backup.directory.trim().is_empty() {
            return String::new();
        }
        self.backup_dir_path().to_string_lossy().into_owned()
    }

    fn project_root(&self) -> String {
        self.project_root_path().to_string_lossy().into_owned()
    }
}
