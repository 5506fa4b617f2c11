//! Prompt construction

pub mod builder;
pub mod role;

pub use builder::{PromptBuilder, CONSENSUS_WINDOW, RECENT_CONTEXT_WINDOW};
pub use role::RoleCategory;
