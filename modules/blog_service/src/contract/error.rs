//! Contract error types for blog service
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Blog service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlogError {
    /// Post or taxonomy entry not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (post, category, subcategory, tag)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Conflict (duplicate name, slug taken, default category, entry in use)
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// Input rejected by validation
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Missing or invalid credentials
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Authenticated caller lacks a required role
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl BlogError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
