//! Core domain primitives

pub mod error;
pub mod model;

pub use error::DomainError;
pub use model::ModelId;
