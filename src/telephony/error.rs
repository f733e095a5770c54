//! Voice platform error types

use reqwest::StatusCode;
use thiserror::Error;

/// Voice platform error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PlatformError {
    pub kind: PlatformErrorKind,
    pub message: String,
}

impl PlatformError {
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Credentials, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Network, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Unknown, message)
    }

    /// Classify a non-success HTTP response
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let kind = match status.as_u16() {
            401 | 403 => PlatformErrorKind::Auth,
            400 | 404 | 422 => PlatformErrorKind::InvalidRequest,
            429 => PlatformErrorKind::RateLimit,
            500..=599 => PlatformErrorKind::ServerError,
            _ => PlatformErrorKind::Unknown,
        };
        Self::new(kind, message)
    }
}

/// Error classification. Nothing is retried; the kind is for logs and
/// operator messages only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// Credentials missing or placeholder, no request was sent
    Credentials,
    /// Connection failure or timeout
    Network,
    /// Rejected credentials (401, 403)
    Auth,
    /// Platform refused the request (400, 404, 422)
    InvalidRequest,
    /// Too many requests (429)
    RateLimit,
    /// Platform failure (5xx)
    ServerError,
    Unknown,
}
