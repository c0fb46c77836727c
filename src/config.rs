//! Environment-driven directory setup

use crate::directory::UserDirectory;
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// An account to provision at startup, in `login:password@domain`
/// form. The email becomes `login@domain`; the `@domain` part is
/// optional, in which case the login doubles as the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSpec {
    pub login: String,
    pub password: String,
    pub email: String,
}

impl FromStr for UserSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (login, rest) = s
            .split_once(':')
            .ok_or_else(|| Error::Config(format!("user spec '{s}' missing ':'")))?;
        if login.is_empty() {
            return Err(Error::Config(format!("user spec '{s}' has empty login")));
        }
        let (password, email) = match rest.rsplit_once('@') {
            Some((password, domain)) => (password, format!("{login}@{domain}")),
            None => (rest, login.to_string()),
        };
        Ok(Self {
            login: login.to_string(),
            password: password.to_string(),
            email,
        })
    }
}

/// Startup configuration for a [`UserDirectory`].
///
/// Mirrors what a test harness would otherwise do by hand: set the
/// authentication policy and pre-provision a fixed set of accounts.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// When true, unknown identifiers are auto-provisioned on first
    /// authentication instead of being rejected.
    pub auth_disabled: bool,
    /// Accounts to create up front.
    pub users: Vec<UserSpec>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads from `.env` if present. All variables are optional:
    /// - `STUBMAIL_AUTH_DISABLED` (`true`/`false`, default `false`)
    /// - `STUBMAIL_USERS` (comma-separated `login:password@domain`
    ///   specs)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for unparseable values.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let auth_disabled = match env::var("STUBMAIL_AUTH_DISABLED") {
            Ok(v) => v
                .parse()
                .map_err(|e| Error::Config(format!("Invalid STUBMAIL_AUTH_DISABLED: {e}")))?,
            Err(_) => false,
        };

        let users = match env::var("STUBMAIL_USERS") {
            Ok(v) => v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(UserSpec::from_str)
                .collect::<Result<Vec<_>>>()?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            auth_disabled,
            users,
        })
    }

    /// Apply this configuration to a directory: set the auth policy
    /// and create the configured accounts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateUser`] if two specs collide or an
    /// account already exists.
    pub fn apply(&self, directory: &UserDirectory) -> Result<()> {
        directory.set_auth_required(!self.auth_disabled);
        for spec in &self.users {
            directory.create_user(&spec.email, &spec.login, Some(&spec.password))?;
        }
        Ok(())
    }
}
