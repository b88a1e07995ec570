//! Error types used throughout GridSave

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote operation a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Retrieve,
    Update,
    Delete,
    Query,
    Count,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Retrieve => "retrieve",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Query => "query",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of [`GridSaveError`] for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Auth,
    Operation(OperationKind),
    Validation,
    Unsupported,
    Decode,
    Config,
}

/// Main error type for GridSave
///
/// The message of transport, auth, operation, validation and unsupported
/// failures is displayed verbatim so callers see exactly what the backend
/// exchange produced.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GridSaveError {
    /// The HTTP exchange itself could not complete (connection, timeout).
    #[error("{0}")]
    Transport(String),

    /// The credential exchange was rejected or returned an unreadable body.
    #[error("{0}")]
    Auth(String),

    /// The backend answered a primary request with an unexpected status.
    #[error("{message}")]
    Operation { kind: OperationKind, message: String },

    /// A local precondition failed before any network call.
    #[error("{0}")]
    Validation(String),

    /// The operation is not offered by this backend.
    #[error("{0}")]
    Unsupported(String),

    /// A successful response did not have the expected envelope shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GridSaveError {
    pub fn operation(kind: OperationKind, message: impl Into<String>) -> Self {
        Self::Operation { kind, message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Operation { kind, .. } => ErrorKind::Operation(*kind),
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the failure happened before anything reached the network.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Unsupported(_) | Self::Config(_))
    }
}

/// Result type alias for GridSave operations
pub type Result<T> = std::result::Result<T, GridSaveError>;
