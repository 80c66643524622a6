//! Postgres connection strings
//!
//! Parses connection URLs into the discrete parameters the Postgres client
//! tools expect, and decides which URL applies to an environment.

use crate::config::EnvironmentConfig;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Port used when the URL does not name one
pub const DEFAULT_PORT: u16 = 5432;

/// Database used when the URL path is empty
pub const DEFAULT_DATABASE: &str = "postgres";

/// Errors raised while resolving or parsing a connection URL
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The URL could not be parsed at all
    #[error("invalid connection URL: {reason}")]
    InvalidUrl {
        /// Parser diagnostic
        reason: String,
    },

    /// The URL has no host component
    #[error("missing host in connection URL")]
    MissingHost,

    /// The port is not an integer in 1..=65535
    #[error("invalid port in connection URL: {value}")]
    InvalidPort {
        /// The offending port text, when it could be recovered
        value: String,
    },

    /// No URL was supplied for the environment
    #[error("no database URL configured for environment '{environment}'")]
    MissingDatabaseUrl {
        /// Environment that was looked up
        environment: String,
    },
}

/// Discrete connection parameters extracted from a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionParams {
    /// Database host, never empty
    pub host: String,
    /// Database port
    pub port: u16,
    /// Login role, taken verbatim from the URL
    pub user: String,
    /// Password, empty when the URL carries none
    #[serde(skip)]
    pub password: String,
    /// Database name
    pub database: String,
}

impl ConnectionParams {
    /// Password suitable for display
    #[must_use]
    pub fn masked_password(&self) -> &'static str {
        if self.password.is_empty() {
            "(none)"
        } else {
            "********"
        }
    }
}

/// Parse a `scheme://[user[:password]@]host[:port][/database][?query]` URL.
///
/// The query string is accepted and ignored. User and password are
/// percent-decoded, so `p%40ss` yields `p@ss`.
pub fn parse_connection_url(raw: &str) -> Result<ConnectionParams, ConnectionError> {
    let url = Url::parse(raw.trim()).map_err(|e| match e {
        url::ParseError::InvalidPort => ConnectionError::InvalidPort {
            value: port_text(raw).unwrap_or_default(),
        },
        url::ParseError::EmptyHost => ConnectionError::MissingHost,
        other => ConnectionError::InvalidUrl {
            reason: other.to_string(),
        },
    })?;

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => return Err(ConnectionError::MissingHost),
    };

    let port = match url.port() {
        None => DEFAULT_PORT,
        Some(0) => {
            return Err(ConnectionError::InvalidPort {
                value: "0".to_string(),
            })
        }
        Some(port) => port,
    };

    let database = match url.path().trim_start_matches('/') {
        "" => DEFAULT_DATABASE.to_string(),
        name => name.to_string(),
    };

    Ok(ConnectionParams {
        host,
        port,
        user: decode_credential(url.username()),
        password: decode_credential(url.password().unwrap_or_default()),
        database,
    })
}

fn decode_credential(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Best-effort recovery of the port text for error messages
fn port_text(raw: &str) -> Option<String> {
    let after_scheme = raw.split_once("://")?.1;
    let authority = after_scheme.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    host_port
        .rsplit_once(':')
        .map(|(_, port)| port.to_string())
}

/// Pick the connection URL for an environment.
///
/// Precedence: a non-blank explicit URL, then the variable named by
/// `url_env` (read through `lookup`), then the inline `url`.
pub fn resolve_database_url<F>(
    explicit: Option<&str>,
    environment: &str,
    config: Option<&EnvironmentConfig>,
    lookup: F,
) -> Result<String, ConnectionError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(url.to_string());
    }

    if let Some(config) = config {
        let from_env = config
            .url_env
            .as_deref()
            .and_then(|var| lookup(var))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if let Some(url) = from_env {
            return Ok(url);
        }

        if let Some(url) = config.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }
    }

    Err(ConnectionError::MissingDatabaseUrl {
        environment: environment.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_text_recovery() {
        assert_eq!(
            port_text("postgresql://user:pw@host:abc/db").as_deref(),
            Some("abc")
        );
        assert_eq!(port_text("postgresql://host:70000").as_deref(), Some("70000"));
        assert_eq!(port_text("no-scheme"), None);
    }

    #[test]
    fn test_masked_password() {
        let mut params = parse_connection_url("postgresql://u:secret@h/db").unwrap();
        assert_eq!(params.masked_password(), "********");
        params.password.clear();
        assert_eq!(params.masked_password(), "(none)");
    }
}
