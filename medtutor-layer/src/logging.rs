//! Logging layer for provider operations.

use async_trait::async_trait;
use medtutor_core::error::AiError;
use medtutor_core::layer::{Layer, LayeredProvider};
use medtutor_core::provider::{GenerateContentStream, Provider};
use medtutor_core::types::*;
use std::fmt::Debug;
use std::sync::Arc;

/// Logging layer that logs provider operations.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[medtutor]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Layer<P> for LoggingLayer {
    type LayeredProvider = LoggingProvider<P>;

    fn layer(&self, inner: P) -> Self::LayeredProvider {
        LoggingProvider {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Provider wrapped with logging
#[derive(Debug)]
pub struct LoggingProvider<P> {
    inner: P,
    prefix: String,
}

impl<P> LoggingProvider<P> {
    fn log_request(&self, op: &str, req: &GenerateContentRequest) {
        let config = req.generation_config.as_ref();
        tracing::debug!(
            model = %req.model,
            turns = req.contents.len(),
            system_instruction = req.system_instruction.is_some(),
            temperature = ?config.and_then(|c| c.temperature),
            response_mime_type = ?config.and_then(|c| c.response_mime_type.as_deref()),
            "{} {} request",
            self.prefix,
            op
        );
    }
}

#[async_trait]
impl<P: Provider> LayeredProvider for LoggingProvider<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        self.log_request("generate_content", &req);

        let start = std::time::Instant::now();
        let result = self.inner.generate_content(req).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    response_id = ?response.response_id,
                    candidates = response.candidates.len(),
                    tokens = response.usage().total_tokens,
                    finish_reason = ?response.finish_reason(),
                    elapsed = ?elapsed,
                    "{} generate_content success",
                    self.prefix
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    retryable = e.is_retryable(),
                    elapsed = ?elapsed,
                    "{} generate_content error",
                    self.prefix
                );
            }
        }

        result
    }

    async fn layered_stream_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<Box<GenerateContentStream>, AiError> {
        self.log_request("stream_generate_content", &req);

        let start = std::time::Instant::now();
        let result = self.inner.stream_generate_content(req).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    elapsed = ?elapsed,
                    "{} stream_generate_content opened",
                    self.prefix
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    retryable = e.is_retryable(),
                    elapsed = ?elapsed,
                    "{} stream_generate_content error",
                    self.prefix
                );
            }
        }

        result
    }
}

#[async_trait]
impl<P: Provider> Provider for LoggingProvider<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        LayeredProvider::layered_info(self)
    }

    async fn generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        LayeredProvider::layered_generate_content(self, req).await
    }

    async fn stream_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<Box<GenerateContentStream>, AiError> {
        LayeredProvider::layered_stream_generate_content(self, req).await
    }
}
