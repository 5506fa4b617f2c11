//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Discussion has no experts")]
    EmptyRoster,

    #[error("Invalid round count: {0} (must be >= 1)")]
    InvalidRoundCount(u32),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),
}
