//! Environment names for backup and restore targets
//!
//! Users type short mnemonics ("prod", "dev") as often as the full names.
//! This module folds every accepted spelling into a closed set so callers
//! never compare environment strings by hand.

use std::fmt;

/// The well-known environments of a hosted project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The live project
    Production,
    /// The shared development project
    Development,
}

impl Environment {
    /// Normalize free-form text into a known environment.
    ///
    /// Accepts `prod`/`production` and `dev`/`development`, ignoring case and
    /// surrounding whitespace. Anything else (feature branch names included)
    /// returns `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "prod" | "production" => Some(Self::Production),
            "dev" | "development" => Some(Self::Development),
            _ => None,
        }
    }

    /// Filename prefix used for backups of this environment
    #[must_use]
    pub const fn backup_prefix(self) -> &'static str {
        match self {
            Self::Production => "prod",
            Self::Development => "dev",
        }
    }

    /// Canonical long name, as used for configuration keys
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }

    /// Every spelling that [`Environment::parse`] maps to this environment
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Production => &["production", "prod"],
            Self::Development => &["development", "dev"],
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backup filename prefix for any environment token.
///
/// Known environments use their short prefix; other names (feature branches)
/// are trimmed and lower-cased.
#[must_use]
pub fn backup_prefix_for(name: &str) -> String {
    Environment::parse(name).map_or_else(
        || name.trim().to_lowercase(),
        |env| env.backup_prefix().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_aliases() {
        assert_eq!(Environment::parse("prod"), Some(Environment::Production));
        assert_eq!(
            Environment::parse("  Production "),
            Some(Environment::Production)
        );
        assert_eq!(Environment::parse("DEV"), Some(Environment::Development));
        assert_eq!(
            Environment::parse("development"),
            Some(Environment::Development)
        );
        assert_eq!(Environment::parse("staging"), None);
        assert_eq!(Environment::parse("production-eu"), None);
    }

    #[test]
    fn test_backup_prefix_for() {
        assert_eq!(backup_prefix_for("production"), "prod");
        assert_eq!(backup_prefix_for("Dev"), "dev");
        assert_eq!(backup_prefix_for(" Feature-Login "), "feature-login");
    }
}
