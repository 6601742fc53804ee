//! # DomainError
//!
//! Centralized error handling for the review service.
//! Every store-call failure surfaces as exactly one of these variants;
//! the core performs no retries.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Referenced record does not exist (e.g., review looked up by id).
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Caller-supplied value rejected before any store call (e.g., a
    /// review id that does not parse).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport-level failure talking to a backing store.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    pub fn review_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound("review".to_string(), id.to_string())
    }
}

/// A specialized Result type for review-service logic.
pub type Result<T> = std::result::Result<T, DomainError>;
