//! Provider trait and core abstractions.

use crate::error::AiError;
use crate::types::*;
use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::sync::Arc;

/// Stream type alias for streamed content generation chunks
pub type GenerateContentStream =
    dyn Stream<Item = Result<GenerateContentResponse, AiError>> + Send + Unpin;

/// Stream type alias for text chunks
pub type TextStream = dyn Stream<Item = Result<TextChunk, AiError>> + Send + Unpin;

/// Core provider trait for generative AI services.
///
/// Providers only implement the raw `generateContent` exchange. Higher-level
/// operations (text, JSON objects, chat sessions) live in the runtime.
#[async_trait]
pub trait Provider: Send + Sync + Debug + 'static {
    /// Get provider information
    fn info(&self) -> Arc<ProviderInfo>;

    /// Generate content (non-streaming)
    async fn generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError>;

    /// Stream generated content
    ///
    /// Each item is a partial response; concatenating their text yields the
    /// full reply.
    async fn stream_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<Box<GenerateContentStream>, AiError>;
}

/// Helper function to collect a content stream into a text result
pub async fn collect_text_stream(
    model: impl Into<String>,
    mut stream: Box<GenerateContentStream>,
) -> Result<TextResult, AiError> {
    use futures::StreamExt;

    let mut model = model.into();
    let mut content = String::new();
    let mut finish_reason = None;
    let mut usage = None;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let piece = TextChunk::from_response(&chunk);
        content.push_str(&piece.delta);

        if let Some(reason) = piece.finish_reason {
            finish_reason = Some(reason);
        }

        if let Some(u) = piece.usage {
            usage = Some(u);
        }

        if let Some(version) = chunk.model_version {
            model = version;
        }
    }

    let content = if content.is_empty() { None } else { Some(content) };

    Ok(TextResult {
        content: Generated::from_text(content),
        finish_reason,
        usage: usage.unwrap_or_default(),
        model,
    })
}
