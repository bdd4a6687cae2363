//! # medtutor core
//!
//! Core abstractions and runtime for talking to a generative AI service.
//!
//! This crate provides the wire types, the provider and layer traits, JSON
//! output strategies, and the runtime executor that turns raw
//! `generateContent` exchanges into text, JSON objects and chat sessions.

pub mod error;
pub mod layer;
pub mod provider;
pub mod runtime;
pub mod strategy;
pub mod types;

// Re-exports
pub use error::AiError;
pub use layer::{Layer, LayeredProvider};
pub use provider::Provider;
pub use runtime::{ChatSession, RuntimeExecutor};
pub use strategy::{JsonModeStrategy, JsonOutputStrategy, ResponseSchemaStrategy};
pub use types::*;

/// Result type alias for medtutor operations
pub type Result<T> = std::result::Result<T, AiError>;
