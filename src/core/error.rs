//! Reelgen Error Definitions
//!
//! Defines error types used throughout the crate.

use thiserror::Error;

/// Core engine error types
///
/// Every failure aborts the single in-flight request. There is no partial
/// result and no automatic retry at any layer; the caller owns retry policy.
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Request Errors
    // =========================================================================
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // =========================================================================
    // Provider Errors
    // =========================================================================
    #[error("{provider} submit failed ({status}): {body}")]
    ProviderSubmit {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} poll failed ({status}): {body}")]
    ProviderPoll {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} operation failed: {message}")]
    ProviderOperation {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} polling exhausted after {attempts} attempts")]
    ProviderTimeout {
        provider: &'static str,
        attempts: u32,
    },

    #[error("no extractable video artifact in provider response: {response}")]
    NoArtifact { response: String },

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

// ============================================================================
// Tests
// ============================================================================
