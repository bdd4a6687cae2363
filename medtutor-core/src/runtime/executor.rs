//! RuntimeExecutor implementation.
//!
//! Provides the high-level generate_text(), generate_object() and
//! start_chat() APIs on top of a provider's generate_content call, with
//! JSON strategy selection.

use crate::error::AiError;
use crate::layer::Layer;
use crate::provider::{Provider, TextStream};
use crate::runtime::chat::ChatSession;
use crate::strategy::{detect_json_strategy, JsonOutputStrategy};
use crate::types::*;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Type-erased provider that can be shared across threads
type BoxedProvider = Arc<dyn Provider>;

/// Builder for composing a provider with layers.
///
/// Layers wrap the provider with static dispatch while building; the result
/// is erased once in `finish()`.
///
/// # Example
///
/// ```ignore
/// let executor = RuntimeExecutor::builder(gemini_provider)
///     .layer(LoggingLayer::new())
///     .finish();
/// ```
pub struct RuntimeExecutorBuilder<P> {
    provider: P,
    json_strategy: Option<Box<dyn JsonOutputStrategy>>,
}

impl<P: Provider> RuntimeExecutorBuilder<P> {
    /// Create a new builder with a provider
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            json_strategy: None,
        }
    }

    /// Add a layer to wrap the provider
    ///
    /// Each call to `layer()` creates a new concrete type by wrapping the
    /// previous provider.
    pub fn layer<L>(self, layer: L) -> RuntimeExecutorBuilder<L::LayeredProvider>
    where
        L: Layer<P>,
    {
        RuntimeExecutorBuilder {
            provider: layer.layer(self.provider),
            json_strategy: self.json_strategy,
        }
    }

    /// Set a custom JSON output strategy
    ///
    /// If not set, the strategy is picked from the provider id.
    pub fn json_strategy(mut self, strategy: Box<dyn JsonOutputStrategy>) -> Self {
        self.json_strategy = Some(strategy);
        self
    }

    /// Finish building and create a RuntimeExecutor
    pub fn finish(self) -> RuntimeExecutor {
        let provider = Arc::new(self.provider);
        let provider_id = provider.info().id.clone();

        let json_strategy = self
            .json_strategy
            .unwrap_or_else(|| detect_json_strategy(&provider_id));

        RuntimeExecutor {
            provider,
            json_strategy,
        }
    }
}

/// Runtime executor.
///
/// Main entry point for making requests. Cheap to share behind a reference;
/// chat sessions it starts hold their own handle to the provider.
pub struct RuntimeExecutor {
    provider: BoxedProvider,
    json_strategy: Box<dyn JsonOutputStrategy>,
}

impl std::fmt::Debug for RuntimeExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeExecutor")
            .field("provider", &self.provider)
            .field("json_strategy", &self.json_strategy.name())
            .finish()
    }
}

impl RuntimeExecutor {
    /// Create a new builder
    pub fn builder<P: Provider>(provider: P) -> RuntimeExecutorBuilder<P> {
        RuntimeExecutorBuilder::new(provider)
    }

    /// Get provider information
    pub fn info(&self) -> Arc<ProviderInfo> {
        self.provider.info()
    }

    /// Shared handle to the (layered) provider
    pub fn provider(&self) -> Arc<dyn Provider> {
        self.provider.clone()
    }

    /// Send a prepared request as-is
    pub async fn generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        self.provider.generate_content(req).await
    }

    /// Generate text
    ///
    /// A response without text is not an error; it comes back as
    /// `Generated::Empty(EmptyReason::NoText)`.
    pub async fn generate_text(
        &self,
        model: impl Into<String>,
        params: TextParams,
    ) -> Result<TextResult, AiError> {
        let model = model.into();
        let req = params.into_request(model.clone());

        let response = self.provider.generate_content(req).await?;
        let result = TextResult::from_response(&model, &response);

        if result.content.is_empty() {
            tracing::warn!(
                model = %model,
                finish_reason = ?result.finish_reason,
                "text generation returned no text"
            );
        }

        Ok(result)
    }

    /// Stream text
    pub async fn stream_text(
        &self,
        model: impl Into<String>,
        params: TextParams,
    ) -> Result<Box<TextStream>, AiError> {
        let req = params.into_request(model);
        let stream = self.provider.stream_generate_content(req).await?;

        Ok(Box::new(stream.map(|chunk| {
            chunk.map(|response| TextChunk::from_response(&response))
        })))
    }

    /// Generate a JSON object matching `params.schema`
    ///
    /// The configured JSON strategy decides how the schema is sent. Missing
    /// or unparseable text becomes `Generated::Empty`.
    pub async fn generate_object(
        &self,
        model: impl Into<String>,
        params: ObjectParams,
    ) -> Result<ObjectResult, AiError> {
        let model = model.into();

        let mut req = GenerateContentRequest::new(model.clone(), params.contents);
        req.system_instruction = params.system_instruction.map(Content::instruction);
        if let Some(temperature) = params.temperature {
            req.generation_config_mut().temperature = Some(temperature);
        }
        if let Some(max_output_tokens) = params.max_output_tokens {
            req.generation_config_mut().max_output_tokens = Some(max_output_tokens);
        }

        self.json_strategy.apply(&mut req, &params.schema)?;

        let response = self.provider.generate_content(req).await?;

        let object: Generated<serde_json::Value> =
            Generated::from_text(response.text()).parse_json();

        if let Some(reason) = object.empty_reason() {
            tracing::warn!(model = %model, %reason, "object generation returned no usable JSON");
        }

        Ok(ObjectResult {
            object,
            usage: response.usage(),
            model: response.model_version.clone().unwrap_or(model),
        })
    }

    /// Generate a JSON object and deserialize it into `T`
    ///
    /// Valid JSON that does not fit `T` is reported as
    /// `EmptyReason::MalformedJson`.
    pub async fn generate_typed<T: DeserializeOwned>(
        &self,
        model: impl Into<String>,
        params: ObjectParams,
    ) -> Result<Generated<T>, AiError> {
        let result = self.generate_object(model, params).await?;

        Ok(match result.object {
            Generated::Value(value) => match serde_json::from_value(value) {
                Ok(typed) => Generated::Value(typed),
                Err(e) => {
                    tracing::warn!(error = %e, "JSON did not match the expected shape");
                    Generated::Empty(EmptyReason::MalformedJson(e.to_string()))
                }
            },
            Generated::Empty(reason) => Generated::Empty(reason),
        })
    }

    /// Start a chat session with empty history
    ///
    /// No request is sent until the first message.
    pub fn start_chat(&self, model: impl Into<String>, config: ChatConfig) -> ChatSession {
        ChatSession::new(self.provider.clone(), model, config)
    }
}
