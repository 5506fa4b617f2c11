//! Application layer for colloquy
//!
//! This crate contains the discussion orchestration use case and the port
//! definitions its adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::completion::{
    CompletionClient, CompletionError, CompletionFactory, GenerationParams, StreamEvent,
    StreamHandle,
};
pub use use_cases::run_discussion::{
    ModeratorHandle, RunDiscussionError, RunDiscussionUseCase, MAX_TURN_RETRIES, TURN_BACKOFF,
};
