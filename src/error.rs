// Error types for servmon

use thiserror::Error;

/// Result type alias using anyhow::Error
pub type Result<T> = anyhow::Result<T>;

/// Servmon-specific error types
#[derive(Error, Debug)]
pub enum ServmonError {
    #[error("Failed to enumerate services: {0}")]
    Enumeration(String),

    #[error("Failed to query status for '{service}': {message}")]
    Status { service: String, message: String },

    #[error("Unknown or disallowed service: {0}")]
    InvalidService(String),

    #[error("Failed to restart '{service}': {stderr}")]
    Restart { service: String, stderr: String },

    #[error("CI status lookup failed: {0}")]
    CiStatus(String),

    #[error("Failed to deliver alert: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
