//! Gemini provider implementation over the `generateContent` REST API.
//!
//! The provider implements the Provider trait's two calls,
//! `generate_content()` and `stream_generate_content()`. Higher-level
//! operations are handled by the runtime.

use crate::sse::SseDecoder;
use medtutor_core::error::AiError;
use medtutor_core::provider::{GenerateContentStream, Provider};
use medtutor_core::types::*;
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Default service endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default API version path segment
pub const DEFAULT_API_VERSION: &str = "v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider using reqwest
#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    api_version: String,
    info: Arc<ProviderInfo>,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("GeminiProvider")
            .field("info", &self.info)
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("api_key", &api_key)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider with default configuration
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            info: Arc::new(ProviderInfo {
                id: "gemini".to_string(),
                name: "Google Gemini".to_string(),
            }),
        }
    }

    /// Create a builder for more configuration options
    pub fn builder() -> GeminiBuilder {
        GeminiBuilder::default()
    }

    /// The credential sent with every request
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL requests are sent to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// URL for a model method, e.g. `generateContent`
    pub fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.api_base.trim_end_matches('/'),
            self.api_version,
            model.trim_start_matches("models/"),
            method
        )
    }

    /// POST a request body and turn non-success statuses into errors
    async fn post(
        &self,
        url: &str,
        req: &GenerateContentRequest,
    ) -> Result<reqwest::Response, AiError> {
        tracing::debug!(url = %url, turns = req.contents.len(), "sending Gemini request");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "HTTP request failed");
                AiError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(error_from_status(status.as_u16(), &body));
        }

        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Map an HTTP error status and body onto an `AiError`
pub(crate) fn error_from_status(status: u16, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        format!("HTTP {}", status)
    } else {
        message
    };

    match status {
        // The service reports a bad key as INVALID_ARGUMENT
        400 if body.contains("API_KEY_INVALID") || message.contains("API key not valid") => {
            AiError::authentication(message)
        }
        400 => AiError::invalid_request(message),
        401 | 403 => AiError::authentication(message),
        404 => AiError::model_not_found(message),
        408 | 504 => AiError::timeout(message),
        429 => AiError::rate_limit(message),
        _ => AiError::provider(format!("Gemini API error ({}): {}", status, message)),
    }
}

/// Decode an SSE byte stream into response chunks
pub(crate) fn decode_sse<S, B, E>(
    bytes: S,
) -> impl Stream<Item = Result<GenerateContentResponse, AiError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<AiError> + Send,
{
    async_stream::try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = SseDecoder::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            for payload in decoder.push(chunk.as_ref()) {
                let response: GenerateContentResponse = serde_json::from_str(&payload)?;
                yield response;
            }
        }

        if let Some(payload) = decoder.finish() {
            let response: GenerateContentResponse = serde_json::from_str(&payload)?;
            yield response;
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    async fn generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        let url = self.endpoint(&req.model, "generateContent");
        let response = self.post(&url, &req).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Gemini response");
            AiError::provider(format!("Failed to parse response: {}", e))
        })
    }

    async fn stream_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<Box<GenerateContentStream>, AiError> {
        let url = format!("{}?alt=sse", self.endpoint(&req.model, "streamGenerateContent"));
        let response = self.post(&url, &req).await?;

        let stream = decode_sse(response.bytes_stream());
        Ok(Box::new(Box::pin(stream)))
    }
}

/// Builder for Gemini provider with custom configuration
#[derive(Default)]
pub struct GeminiBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiBuilder {
    /// Set API key
    ///
    /// An empty key is accepted and forwarded; the service rejects it.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set API base URL (proxies, regional endpoints, test servers)
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set API version path segment
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set a per-request timeout. Without one the HTTP client default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<GeminiProvider, AiError> {
        self.build_with_id("gemini", "Google Gemini")
    }

    /// Build a provider with a custom provider ID and name
    pub fn build_with_id(
        self,
        provider_id: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Result<GeminiProvider, AiError> {
        let api_key = self
            .api_key
            .ok_or_else(|| AiError::configuration("API key is required"))?;

        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client
            .build()
            .map_err(|e| AiError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GeminiProvider {
            client,
            api_key,
            api_base: self.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            info: Arc::new(ProviderInfo {
                id: provider_id.into(),
                name: provider_name.into(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_api_key() {
        let err = GeminiProvider::builder().build().unwrap_err();
        assert!(matches!(err, AiError::Configuration(_)));
    }

    #[test]
    fn api_key_is_forwarded_unchanged() {
        let provider = GeminiProvider::builder().api_key("abc-123").build().unwrap();
        assert_eq!(provider.api_key(), "abc-123");

        let empty = GeminiProvider::builder().api_key("").build().unwrap();
        assert_eq!(empty.api_key(), "");
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let provider = GeminiProvider::new("super-secret");
        let printed = format!("{:?}", provider);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn endpoint_layout() {
        let provider = GeminiProvider::builder()
            .api_key("k")
            .api_base("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(
            provider.endpoint("gemini-3-flash-preview", "generateContent"),
            "http://localhost:8080/v1beta/models/gemini-3-flash-preview:generateContent"
        );
        assert_eq!(
            provider.endpoint("models/gemini-x", "streamGenerateContent"),
            "http://localhost:8080/v1beta/models/gemini-x:streamGenerateContent"
        );
        assert_eq!(provider.info().id, "gemini");
    }

    #[test]
    fn status_mapping() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        match error_from_status(429, body) {
            AiError::RateLimit(msg) => assert_eq!(msg, "Resource has been exhausted"),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(error_from_status(403, ""), AiError::Authentication(_)));
        assert!(matches!(error_from_status(404, "nope"), AiError::ModelNotFound(_)));
        assert!(matches!(error_from_status(504, ""), AiError::Timeout(_)));
        assert!(matches!(error_from_status(400, "{}"), AiError::InvalidRequest(_)));
        assert!(matches!(error_from_status(500, ""), AiError::Provider(_)));
    }

    #[test]
    fn invalid_key_is_authentication_error() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert!(matches!(
            error_from_status(400, body),
            AiError::Authentication(_)
        ));
    }

    #[tokio::test]
    async fn decode_sse_yields_responses() {
        let chunks: Vec<Result<&'static [u8], AiError>> = vec![
            Ok(&b"data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n\r\n"[..]),
            Ok(&b"data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"lo\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n"[..]),
        ];

        let responses: Vec<_> = decode_sse(futures::stream::iter(chunks)).collect().await;
        assert_eq!(responses.len(), 2);
        let texts: Vec<String> = responses
            .into_iter()
            .map(|r| r.unwrap().text().unwrap_or_default())
            .collect();
        assert_eq!(texts, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn decode_sse_surfaces_bad_json() {
        let chunks: Vec<Result<&'static [u8], AiError>> = vec![Ok(&b"data: not-json\n\n"[..])];
        let responses: Vec<_> = decode_sse(futures::stream::iter(chunks)).collect().await;
        assert!(matches!(responses[0], Err(AiError::Serialization(_))));
    }
}
