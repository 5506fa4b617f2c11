//! Durable event logging

pub mod jsonl_events;

pub use jsonl_events::JsonlEventLogger;
