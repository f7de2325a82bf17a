//! Error types for workspace operations.
//!
//! Validation and not-found failures are rejected before any state is
//! mutated; storage failures are handled (and logged) inside the storage
//! layer and never surface here.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A required field was blank or otherwise unusable.
    #[error("{message}")]
    Validation { message: String },

    /// The referenced note does not exist (stale or wrong id).
    #[error("Note not found: {id}")]
    NoteNotFound { id: Uuid },

    /// The URL of a quick link did not parse as an absolute URL.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// An imported project file did not have the expected shape.
    #[error("Invalid project file: {message}")]
    InvalidSnapshot { message: String },
}

impl WorkspaceError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkspaceError::Validation {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;
