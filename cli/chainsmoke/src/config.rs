//! Configuration for the suite.
//!
//! Handles:
//! - Node and initiator endpoint URLs
//! - API credentials loaded from a two-line email/password file
//!
//! A missing or malformed credentials file is fatal before any test runs.

use std::fs;
use std::path::Path;

use crate::error::CliError;

/// Default control API URL of the node.
pub const DEFAULT_CHAINLINK_URL: &str = "http://localhost:6688";

/// Default URL the node reaches the external initiator on.
pub const DEFAULT_INITIATOR_URL: &str = "http://external-initiator:8080";

/// Default location of the credentials file.
pub const DEFAULT_CREDENTIALS_FILE: &str = "secrets/apicredentials";

/// API credentials for the node's session endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Load credentials from a file: email on the first line, password on the
    /// second.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut lines = contents.lines();
        let email = lines.next().unwrap_or("").trim().to_string();
        let password = lines.next().unwrap_or("").trim().to_string();

        if email.is_empty() || password.is_empty() {
            return Err(CliError::Config(format!(
                "credentials file {} must contain an email line and a password line",
                path.display()
            )));
        }

        Ok(Self { email, password })
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the node's control API.
    pub chainlink_url: String,

    /// Base URL the node should reach the external initiator on.
    pub initiator_url: String,

    /// Session credentials.
    pub credentials: Credentials,
}
