//! Discussion domain: experts, messages, styles, scheduling, state and events

pub mod event;
pub mod expert;
pub mod message;
pub mod parsing;
pub mod schedule;
pub mod state;
pub mod style;
pub mod summary;

pub use event::DiscussionEvent;
pub use expert::{DiscussionConfig, Expert};
pub use message::{Message, MessageRole};
pub use parsing::{decode_summary, parse_consensus_score};
pub use schedule::TurnScheduler;
pub use state::{extract_key_points, DiscussionState, SURFACED_POINTS};
pub use style::{DebateStyle, StylePicker};
pub use summary::{DiscussionSummary, Sentiment};
