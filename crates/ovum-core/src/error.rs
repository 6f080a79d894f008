//! Error types for the Ovum client library.
//!
//! This module defines the error taxonomy shared by every operation: network
//! failures, API errors carrying the server's `detail` message, client-side
//! validation, and authentication errors that invalidate the stored session.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Ovum client.
#[derive(Debug, Error)]
pub enum OvumError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    // API errors (non-2xx responses)
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("request failed"))]
    Api {
        status: u16,
        /// Server-provided `detail` message, when the body carried one.
        detail: Option<String>,
    },

    #[error("Unauthorized: {}", .detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },

    #[error("Forbidden: {}", .detail.as_deref().unwrap_or("insufficient role"))]
    Forbidden { detail: Option<String> },

    #[error("Not found: {}", .detail.as_deref().unwrap_or("resource not found"))]
    NotFound { detail: Option<String> },

    // Upload errors
    #[error("Failed to upload {file_name}. Please try again.")]
    UploadFailed {
        file_name: String,
        /// Underlying failure, preserved for logs but not shown inline.
        cause: Option<String>,
    },

    // File system errors (local files staged for upload)
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors (client-side, before submission)
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // RPC parameter errors
    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("Operation was cancelled")]
    Cancelled,

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Ovum client operations.
pub type Result<T> = std::result::Result<T, OvumError>;

// Conversion implementations for common error types

impl From<std::io::Error> for OvumError {
    fn from(err: std::io::Error) -> Self {
        OvumError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for OvumError {
    fn from(err: serde_json::Error) -> Self {
        OvumError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for OvumError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OvumError::Timeout(crate::config::NetworkConfig::REQUEST_TIMEOUT)
        } else {
            OvumError::Network {
                message: err.to_string(),
                cause: Some(err.to_string()),
            }
        }
    }
}

impl OvumError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        OvumError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// The server-provided `detail` message, if this error carries one.
    pub fn api_detail(&self) -> Option<&str> {
        match self {
            OvumError::Api { detail, .. }
            | OvumError::Unauthorized { detail }
            | OvumError::Forbidden { detail }
            | OvumError::NotFound { detail } => detail.as_deref(),
            _ => None,
        }
    }

    /// The message to surface inline for this error.
    ///
    /// Prefers the server's `detail` when present, falling back to the
    /// caller-supplied generic message otherwise. Mirrors how the UI layers
    /// present action failures.
    pub fn surface_message(&self, fallback: &str) -> String {
        match self.api_detail() {
            Some(detail) if !detail.is_empty() => detail.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Standard JSON-RPC error codes:
    /// - -32700: Parse error
    /// - -32600: Invalid Request
    /// - -32601: Method not found
    /// - -32602: Invalid params
    /// - -32603: Internal error
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network/connectivity error
    /// - -32001: Unauthorized (session invalidated)
    /// - -32002: Forbidden for the current role
    /// - -32003: Resource not found
    /// - -32004: Cancelled by caller
    /// - -32005: Validation error
    /// - -32006: Upload failed
    /// - -32007: API error with server detail
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            OvumError::Network { .. } | OvumError::Timeout(_) => -32000,
            OvumError::Unauthorized { .. } => -32001,
            OvumError::Forbidden { .. } => -32002,
            OvumError::NotFound { .. } => -32003,
            OvumError::Cancelled => -32004,
            OvumError::Validation { .. } => -32005,
            OvumError::UploadFailed { .. } => -32006,
            OvumError::Api { .. } => -32007,
            OvumError::InvalidParams { .. } => -32602,

            // All other errors are internal errors
            _ => -32603,
        }
    }

    /// Check if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OvumError::Network { .. } | OvumError::Timeout(_))
    }
}
