//! # medtutor layers
//!
//! Built-in layers for medtutor providers.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs every provider call with timing and token usage
//!
//! ## Usage
//!
//! ```ignore
//! use medtutor_core::RuntimeExecutor;
//! use medtutor_layer::LoggingLayer;
//!
//! let executor = RuntimeExecutor::builder(provider)
//!     .layer(LoggingLayer::new())
//!     .finish();
//! ```

pub mod logging;

// Re-exports
pub use logging::{LoggingLayer, LoggingProvider};
