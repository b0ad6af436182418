//! Error types for notedigest

use thiserror::Error;

/// Result type alias using DigestError
pub type Result<T> = std::result::Result<T, DigestError>;

/// Error type alias for convenience
pub type Error = DigestError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const UPSTREAM_ERROR: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for notedigest
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} request failed (HTTP {status})")]
    Upstream { service: &'static str, status: u16 },

    #[error("Model error: {0}")]
    Model(String),

    #[error("No JSON found in model response")]
    JsonExtraction,

    #[error("Model response did not match the expected shape")]
    MalformedSummary,

    #[error("{label} failed after {attempts} attempts")]
    RetryExhausted { label: String, attempts: u32 },

    #[error("Request processing failed")]
    RequestFailed,
}

impl DigestError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidQuery(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            Self::Upstream { .. } | Self::RetryExhausted { .. } => exit_codes::UPSTREAM_ERROR,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
