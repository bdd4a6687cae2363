//! Runtime layer.
//!
//! Sits between the high-level API (generate_text, generate_object, chat
//! sessions) and the low-level provider interface (generate_content).
//!
//! The runtime layer is responsible for:
//! - Converting high-level parameters into wire requests
//! - Selecting the JSON output strategy for the provider
//! - Turning raw responses into `Generated` results
//! - Keeping conversation history for chat sessions

pub mod chat;
pub mod executor;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::ChatSession;
pub use executor::RuntimeExecutor;
