//! Error handling and display for the CLI.

use chainsmoke_harness::CheckError;
use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not authenticate against the node")]
    AuthFailed,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an API error from response details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

/// Remote-call failures are transport errors for the retry engine: they fail
/// the current sub-check on first occurrence instead of being polled again.
impl From<CliError> for CheckError {
    fn from(err: CliError) -> Self {
        CheckError::Transport(anyhow::Error::new(err))
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::Config(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check CHAINLINK_URL and the credentials file (--credentials).".yellow()
                );
            }
            CliError::AuthFailed => {
                eprintln!(
                    "\n{}",
                    "Hint: Verify the email/password in the credentials file.".yellow()
                );
            }
            CliError::Api { status, .. } if *status == 401 => {
                eprintln!(
                    "\n{}",
                    "Hint: The node rejected the session. Verify the credentials file.".yellow()
                );
            }
            CliError::Network(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and the node URL.".yellow()
                );
            }
            _ => {}
        }
    }
}
