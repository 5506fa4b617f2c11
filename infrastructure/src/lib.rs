//! Infrastructure layer for colloquy
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading and the JSONL event
//! sink.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileDiscussionConfig, FileProviderConfig};
pub use logging::JsonlEventLogger;
pub use providers::{HttpCompletionClient, HttpCompletionFactory, Provider, ProviderSettings};
