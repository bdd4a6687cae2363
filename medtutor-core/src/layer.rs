//! Layer trait and abstractions.
//!
//! Layers wrap a provider with cross-cutting concerns such as logging while
//! keeping the provider interface unchanged.

use crate::error::AiError;
use crate::provider::{GenerateContentStream, Provider};
use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;

/// Layer trait for wrapping providers.
///
/// Each layer wraps an inner provider and returns a new provider with
/// enhanced capabilities.
pub trait Layer<P: Provider> {
    /// The type of the layered provider
    type LayeredProvider: Provider;

    /// Wrap the inner provider with this layer
    fn layer(&self, inner: P) -> Self::LayeredProvider;
}

/// Helper trait for layered providers.
///
/// Provides forwarding implementations for provider methods; implementers
/// override only the calls they intercept.
#[async_trait]
pub trait LayeredProvider: Sized + Provider {
    /// The inner provider type
    type Inner: Provider;

    /// Get a reference to the inner provider
    fn inner(&self) -> &Self::Inner;

    /// Default implementation for info - forwards to inner
    fn layered_info(&self) -> Arc<ProviderInfo> {
        self.inner().info()
    }

    /// Default implementation for generate_content - forwards to inner
    async fn layered_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        self.inner().generate_content(req).await
    }

    /// Default implementation for stream_generate_content - forwards to inner
    async fn layered_stream_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<Box<GenerateContentStream>, AiError> {
        self.inner().stream_generate_content(req).await
    }
}
