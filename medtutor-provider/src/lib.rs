//! # medtutor providers
//!
//! Provider implementations for generative AI services.

pub mod gemini;
pub mod sse;

// Re-exports
pub use gemini::{GeminiBuilder, GeminiProvider, DEFAULT_API_BASE, DEFAULT_API_VERSION};

use medtutor_core::error::AiError;

/// Create a Gemini provider with default endpoint and HTTP settings
///
/// # Example
///
/// ```ignore
/// use medtutor_provider::gemini;
///
/// let provider = gemini("your-api-key")?;
/// ```
pub fn gemini(api_key: impl Into<String>) -> Result<GeminiProvider, AiError> {
    GeminiProvider::builder().api_key(api_key).build()
}
