//! Error types for the CLI application.

use freshtrack_gateway::ExtractError;
use freshtrack_scan::{DraftError, ScanError, SubmitError};
use freshtrack_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Extraction gateway could not be set up
    #[error("Gateway error: {0}")]
    Gateway(#[from] ExtractError),

    /// Scan failed; shown as the user notice
    #[error("{}", .0.user_message())]
    Scan(#[from] ScanError),

    /// Form submission rejected
    #[error("{0}")]
    Submit(#[from] SubmitError),

    /// Draft could not be saved
    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Command needs a signed-in user
    #[error("Not logged in. Use 'login <user-id>' first.")]
    NotSignedIn,
}
