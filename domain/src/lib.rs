//! Domain layer for colloquy
//!
//! Core business logic for orchestrated expert-panel discussions: the
//! roster and configuration, the append-only message log, debate styles
//! and their per-round selection rules, turn scheduling, observable
//! events, and the lenient parsing of model output. No I/O lives here.

pub mod core;
pub mod discussion;
pub mod prompt;

// Re-export commonly used types
pub use core::{DomainError, ModelId};
pub use discussion::{
    decode_summary, extract_key_points, parse_consensus_score, DebateStyle, DiscussionConfig,
    DiscussionEvent, DiscussionState, DiscussionSummary, Expert, Message, MessageRole, Sentiment,
    StylePicker, TurnScheduler,
};
pub use prompt::{PromptBuilder, RoleCategory};
