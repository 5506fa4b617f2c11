//! Completion provider adapters

pub mod factory;
pub mod http;

pub use factory::{HttpCompletionFactory, Provider, ProviderSettings};
pub use http::HttpCompletionClient;
