//! Author identities for new commits.

use std::env;

use crate::config::Config;

/// Name used when neither the configuration nor the environment names a user.
pub const DEFAULT_USER: &str = "user";

/// Supplies the author string recorded on each commit.
pub trait IdentityProvider: std::fmt::Debug {
    /// Returns an identity such as `jane <jane@localhost>`.
    fn identity(&self) -> String;
}

/// Always returns the same identity. Useful for tests and scripted imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIdentity(String);

impl FixedIdentity {
    /// Creates a provider for `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        FixedIdentity(identity.into())
    }
}

impl IdentityProvider for FixedIdentity {
    fn identity(&self) -> String {
        self.0.clone()
    }
}

/// Derives the identity from the `USER` environment variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvIdentity;

impl IdentityProvider for EnvIdentity {
    fn identity(&self) -> String {
        format_identity(&env_user(), None)
    }
}

/// `$USER`, or `DEFAULT_USER` when it is unset or blank.
fn env_user() -> String {
    env::var("USER")
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string())
}

/// Reads `[user] name` and `email` from the repository configuration,
/// falling back to the environment for whatever is missing.
#[derive(Debug, Clone)]
pub struct ConfigIdentity {
    name: Option<String>,
    email: Option<String>,
}

impl ConfigIdentity {
    /// Captures the user settings of `config`.
    pub fn new(config: &Config) -> Self {
        ConfigIdentity {
            name: config.get("user", "name").map(str::to_string),
            email: config.get("user", "email").map(str::to_string),
        }
    }
}

impl IdentityProvider for ConfigIdentity {
    fn identity(&self) -> String {
        match (&self.name, &self.email) {
            (None, None) => EnvIdentity.identity(),
            (Some(name), email) => format_identity(name, email.as_deref()),
            (None, Some(email)) => format_identity(&env_user(), Some(email)),
        }
    }
}

/// Formats `name <email>`; the email defaults to `<name>@localhost`.
fn format_identity(name: &str, email: Option<&str>) -> String {
    // newlines would break the commit header
    let name = name.replace('\n', " ");
    match email {
        Some(email) => format!("{} <{}>", name, email.replace('\n', "")),
        None => format!("{} <{}@localhost>", name, name),
    }
}
