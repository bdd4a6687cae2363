//! Core types for generative AI operations.
//!
//! The wire types mirror the `generateContent` JSON shape (camelCase keys,
//! `contents` made of role-tagged `parts`), so they serialize straight onto
//! the request body.

use serde::{Deserialize, Serialize};

/// Turn role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Raw bytes carried inline in a request, base64 encoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// A single part of a turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    /// Anything the service sends that we do not model (function calls, etc.)
    Other(serde_json::Value),
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an inline data part from already base64-encoded data
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    /// Text of this part, if it is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a turn with explicit role and parts
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// Create a new user turn with text
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Create a new model turn with text
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    /// Create a role-less instruction block (used for `systemInstruction`)
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Append a part
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }
}

/// Sampling and output controls
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

/// MIME type requesting JSON output
pub const JSON_MIME_TYPE: &str = "application/json";

/// Response format for content generation
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Plain text response, no output constraints
    Text,
    /// JSON response without a schema
    Json,
    /// JSON response constrained by a schema
    JsonSchema { schema: serde_json::Value },
}

/// Content generation request.
///
/// `model` is carried alongside the body; it becomes part of the URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip)]
    pub model: String,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a new request
    pub fn new(model: impl Into<String>, contents: Vec<Content>) -> Self {
        Self {
            model: model.into(),
            contents,
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Set the system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::instruction(instruction));
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation_config_mut().temperature = Some(temperature);
        self
    }

    /// Set max output tokens
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.generation_config_mut().max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Set response format
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.set_response_format(format);
        self
    }

    /// Set response format in place
    pub fn set_response_format(&mut self, format: ResponseFormat) {
        let config = self.generation_config_mut();
        match format {
            ResponseFormat::Text => {
                config.response_mime_type = None;
                config.response_schema = None;
            }
            ResponseFormat::Json => {
                config.response_mime_type = Some(JSON_MIME_TYPE.to_string());
                config.response_schema = None;
            }
            ResponseFormat::JsonSchema { schema } => {
                config.response_mime_type = Some(JSON_MIME_TYPE.to_string());
                config.response_schema = Some(schema);
            }
        }
    }

    /// Generation config, created empty on first access
    pub fn generation_config_mut(&mut self) -> &mut GenerationConfig {
        self.generation_config.get_or_insert_with(GenerationConfig::default)
    }
}

/// Why the model stopped producing tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    #[serde(other)]
    Other,
}

/// A single candidate in a response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Token accounting as reported by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// Content generation response (also used for each streamed chunk)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl GenerateContentResponse {
    /// Content of the first candidate
    pub fn first_content(&self) -> Option<&Content> {
        self.candidates.first().and_then(|c| c.content.as_ref())
    }

    /// Text of the first candidate. Empty text counts as no text.
    pub fn text(&self) -> Option<String> {
        self.first_content()
            .map(Content::text)
            .filter(|text| !text.is_empty())
    }

    /// Finish reason of the first candidate
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.candidates.first().and_then(|c| c.finish_reason.clone())
    }

    /// Token usage, zeroed when the service omitted it
    pub fn usage(&self) -> Usage {
        self.usage_metadata
            .as_ref()
            .map(Usage::from)
            .unwrap_or_default()
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<&UsageMetadata> for Usage {
    fn from(meta: &UsageMetadata) -> Self {
        Self {
            prompt_tokens: meta.prompt_token_count,
            completion_tokens: meta.candidates_token_count,
            total_tokens: meta.total_token_count,
        }
    }
}

/// Why a generation produced nothing usable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The response carried no text
    NoText,
    /// The text could not be parsed into the expected shape
    MalformedJson(String),
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyReason::NoText => write!(f, "response contained no text"),
            EmptyReason::MalformedJson(msg) => write!(f, "response was not valid JSON: {}", msg),
        }
    }
}

/// Outcome of a generation that succeeded at the transport level.
///
/// Keeps "the service answered but gave us nothing" apart from a real
/// value so callers choose their own fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated<T> {
    Value(T),
    Empty(EmptyReason),
}

impl<T> Generated<T> {
    /// Borrow the value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Generated::Value(v) => Some(v),
            Generated::Empty(_) => None,
        }
    }

    /// Take the value, if any
    pub fn into_value(self) -> Option<T> {
        match self {
            Generated::Value(v) => Some(v),
            Generated::Empty(_) => None,
        }
    }

    /// Reason for an empty result
    pub fn empty_reason(&self) -> Option<&EmptyReason> {
        match self {
            Generated::Value(_) => None,
            Generated::Empty(reason) => Some(reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Generated::Empty(_))
    }

    /// Value or the given fallback
    pub fn unwrap_or(self, fallback: T) -> T {
        self.into_value().unwrap_or(fallback)
    }

    /// Value or a fallback computed from the empty reason
    pub fn unwrap_or_else(self, f: impl FnOnce(EmptyReason) -> T) -> T {
        match self {
            Generated::Value(v) => v,
            Generated::Empty(reason) => f(reason),
        }
    }

    /// Map the contained value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        match self {
            Generated::Value(v) => Generated::Value(f(v)),
            Generated::Empty(reason) => Generated::Empty(reason),
        }
    }
}

impl<T: Default> Generated<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_value().unwrap_or_default()
    }
}

impl Generated<String> {
    /// Wrap optional response text
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            Some(text) => Generated::Value(text),
            None => Generated::Empty(EmptyReason::NoText),
        }
    }

    /// Parse the text as JSON into `T`
    pub fn parse_json<T: serde::de::DeserializeOwned>(self) -> Generated<T> {
        match self {
            Generated::Value(text) => match serde_json::from_str(&text) {
                Ok(v) => Generated::Value(v),
                Err(e) => Generated::Empty(EmptyReason::MalformedJson(e.to_string())),
            },
            Generated::Empty(reason) => Generated::Empty(reason),
        }
    }
}

/// Text generation parameters
#[derive(Debug, Clone, Default)]
pub struct TextParams {
    /// Turns in the conversation
    pub contents: Vec<Content>,

    /// System instruction
    pub system_instruction: Option<String>,

    /// Maximum number of tokens to generate
    pub max_output_tokens: Option<u32>,

    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,

    /// Top-p sampling
    pub top_p: Option<f32>,

    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

impl TextParams {
    /// Create new text parameters with turns
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    /// Set system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set max output tokens
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the wire request for `model`
    pub fn into_request(self, model: impl Into<String>) -> GenerateContentRequest {
        let mut req = GenerateContentRequest::new(model, self.contents);
        req.system_instruction = self.system_instruction.map(Content::instruction);

        if self.temperature.is_some()
            || self.max_output_tokens.is_some()
            || self.top_p.is_some()
            || self.stop_sequences.is_some()
        {
            let config = req.generation_config_mut();
            config.temperature = self.temperature;
            config.max_output_tokens = self.max_output_tokens;
            config.top_p = self.top_p;
            config.stop_sequences = self.stop_sequences;
        }

        req
    }
}

/// Text generation result
#[derive(Debug, Clone)]
pub struct TextResult {
    pub content: Generated<String>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Usage,
    pub model: String,
}

impl TextResult {
    /// Build a result from a raw response. `model` is used when the service
    /// does not report a model version.
    pub fn from_response(model: &str, response: &GenerateContentResponse) -> Self {
        Self {
            content: Generated::from_text(response.text()),
            finish_reason: response.finish_reason(),
            usage: response.usage(),
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
        }
    }
}

/// Streaming text chunk
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub delta: String,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<Usage>,
}

impl TextChunk {
    /// Build a chunk from one streamed response
    pub fn from_response(response: &GenerateContentResponse) -> Self {
        Self {
            delta: response.first_content().map(Content::text).unwrap_or_default(),
            finish_reason: response.finish_reason(),
            usage: response.usage_metadata.as_ref().map(Usage::from),
        }
    }
}

/// Object generation parameters
#[derive(Debug, Clone)]
pub struct ObjectParams {
    pub contents: Vec<Content>,
    pub schema: serde_json::Value,
    pub system_instruction: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ObjectParams {
    /// Create new object parameters
    pub fn new(contents: Vec<Content>, schema: serde_json::Value) -> Self {
        Self {
            contents,
            schema,
            system_instruction: None,
            max_output_tokens: None,
            temperature: None,
        }
    }

    /// Set system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Object generation result
#[derive(Debug, Clone)]
pub struct ObjectResult {
    pub object: Generated<serde_json::Value>,
    pub usage: Usage,
    pub model: String,
}

/// Provider information
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
}

/// Fixed configuration of a chat session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConfig {
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let req = GenerateContentRequest::new(
            "gemini-test",
            vec![Content::user("look")
                .with_part(Part::inline_data("image/jpeg", "AAAA"))],
        )
        .with_system_instruction("be brief")
        .with_temperature(0.5);

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "look"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}}
                    ]
                }],
                "systemInstruction": {"parts": [{"text": "be brief"}]},
                "generationConfig": {"temperature": 0.5}
            })
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5},
            "modelVersion": "gemini-test-001"
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("Hello, world"));
        assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
        assert_eq!(response.usage().total_tokens, 5);
    }

    #[test]
    fn empty_text_is_treated_as_missing() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": ""}]}}]
        }))
        .unwrap();
        assert_eq!(response.text(), None);

        let no_candidates = GenerateContentResponse::default();
        assert_eq!(no_candidates.text(), None);
        assert_eq!(no_candidates.usage(), Usage::default());
    }

    #[test]
    fn unknown_parts_and_finish_reasons_still_parse() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"functionCall": {"name": "x", "args": {}}}]},
                "finishReason": "FINISH_REASON_UNSPECIFIED"
            }]
        }))
        .unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.finish_reason(), Some(FinishReason::Other));
    }

    #[test]
    fn generated_parse_json_reports_malformed_text() {
        let parsed: Generated<serde_json::Value> =
            Generated::Value("not json".to_string()).parse_json();
        assert!(matches!(
            parsed.empty_reason(),
            Some(EmptyReason::MalformedJson(_))
        ));

        let missing: Generated<serde_json::Value> = Generated::from_text(None).parse_json();
        assert_eq!(missing.empty_reason(), Some(&EmptyReason::NoText));
    }

    #[test]
    fn response_format_json_schema_sets_mime_and_schema() {
        let schema = json!({"type": "OBJECT"});
        let req = GenerateContentRequest::new("m", vec![]).with_response_format(
            ResponseFormat::JsonSchema {
                schema: schema.clone(),
            },
        );
        let config = req.generation_config.unwrap();
        assert_eq!(config.response_mime_type.as_deref(), Some(JSON_MIME_TYPE));
        assert_eq!(config.response_schema, Some(schema));
    }

    #[test]
    fn text_params_without_sampling_leave_config_unset() {
        let req = TextParams::new(vec![Content::user("hi")]).into_request("m");
        assert!(req.generation_config.is_none());
        assert!(req.system_instruction.is_none());
    }
}
