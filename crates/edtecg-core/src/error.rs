//! Error types for the EDTECG client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, storage and input validation errors.
//!
//! Every variant is `Clone`: a single token-refresh failure is handed to each
//! request that was waiting on it, so the error must be shareable. Errors from
//! third-party crates are flattened into messages at the crate boundary.

use std::fmt;
use thiserror::Error;

/// The unified error type for client operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, cancellation).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The server answered with a non-success status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (malformed URL, empty token, bad body).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential store errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns the HTTP status code if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            _ => None,
        }
    }

    /// Returns true if the server rejected the request with 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns true if this error ended the session and the user must log in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::SessionExpired) | Error::Auth(AuthError::RefreshFailed(_))
        )
    }
}

/// Transport-level errors. No response was received from the server.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The operation was dropped before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// The response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The login endpoint rejected the username/password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration was rejected because the username exists.
    #[error("username already taken")]
    UsernameTaken,

    /// Registration data was rejected by the server.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },

    /// A refresh was needed but no refresh token is stored.
    #[error("session expired")]
    SessionExpired,

    /// The refresh call itself failed.
    #[error("token refresh failed: {0}")]
    RefreshFailed(#[source] Box<Error>),
}

/// A non-success response from the API.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Short error code from the server body, if present.
    pub error: Option<String>,
    /// Human readable message from the server body, if present.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Returns the server message, or the error code when no message was sent.
    pub fn detail(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A token was empty or otherwise unusable.
    #[error("invalid token: {reason}")]
    Token { reason: String },

    /// A header value contained characters that cannot be sent.
    #[error("invalid header '{name}'")]
    Header { name: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential store errors.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The stored data could not be parsed.
    #[error("corrupt credential store {path}: {message}")]
    Corrupt { path: String, message: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(InvalidInputError::Other {
            message: err.to_string(),
        })
    }
}
