// src/error.rs
//! Typed failures surfaced by the service clients and the local store

use thiserror::Error;

use crate::types::profile::Role;

/// Failure of a call to the grading or chat service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected before any network call (file type, size, empty query).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The grading service answered 2xx but reported `success: false`.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Backend { .. } => "BACKEND_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Decode(_) => "DECODE_ERROR",
            Self::AnalysisFailed(_) => "ANALYSIS_FAILED",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// True for failures worth retrying once the backend is reachable again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Backend { .. } | Self::Timeout(_) | Self::Cancelled
        )
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Failure of the device-local session/profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("An account already exists. Please login instead.")]
    AccountExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No active {0} session")]
    NotAuthenticated(Role),

    #[error("Profile not found")]
    ProfileNotFound,
}

/// Failure of a flow that talks to a service and then persists the result.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
