//! JSON output strategies for different providers.
//!
//! - ResponseSchemaStrategy: services that enforce a schema natively (Gemini `responseSchema`)
//! - JsonModeStrategy: services that only honour a JSON MIME type, so the schema
//!   travels in the prompt instead

use crate::error::AiError;
use crate::types::{Content, GenerateContentRequest, Part, ResponseFormat, Role};

/// Strategy for requesting JSON output in a content generation request.
pub trait JsonOutputStrategy: Send + Sync {
    /// Get the strategy name for debugging
    fn name(&self) -> &str;

    /// Apply this strategy to a request so the reply is JSON matching `schema`.
    fn apply(
        &self,
        req: &mut GenerateContentRequest,
        schema: &serde_json::Value,
    ) -> Result<(), AiError>;
}

/// Native schema strategy.
///
/// Sets `responseMimeType: application/json` and passes the schema as
/// `responseSchema`; the service constrains decoding to it.
#[derive(Debug, Clone, Default)]
pub struct ResponseSchemaStrategy;

impl ResponseSchemaStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl JsonOutputStrategy for ResponseSchemaStrategy {
    fn name(&self) -> &str {
        "ResponseSchemaStrategy"
    }

    fn apply(
        &self,
        req: &mut GenerateContentRequest,
        schema: &serde_json::Value,
    ) -> Result<(), AiError> {
        req.set_response_format(ResponseFormat::JsonSchema {
            schema: schema.clone(),
        });
        Ok(())
    }
}

/// JSON mode strategy for services without native schema support.
///
/// 1. Sets `responseMimeType: application/json`
/// 2. Injects the schema as an instruction, either into the system
///    instruction or the last user turn
#[derive(Debug, Clone)]
pub struct JsonModeStrategy {
    /// Inject into the system instruction (true) or the last user turn (false)
    pub use_system_instruction: bool,
}

impl JsonModeStrategy {
    /// Create a new JSON mode strategy that uses the system instruction
    pub fn new() -> Self {
        Self {
            use_system_instruction: true,
        }
    }

    /// Create a new JSON mode strategy with configurable injection point
    pub fn with_system_instruction(use_system_instruction: bool) -> Self {
        Self {
            use_system_instruction,
        }
    }

    /// Build a JSON instruction from a schema
    fn build_json_instruction(schema: &serde_json::Value) -> Result<String, AiError> {
        let schema_str = serde_json::to_string_pretty(schema)?;
        Ok(format!(
            "You must respond with valid JSON that matches this schema:\n```json\n{}\n```\n\nIMPORTANT:\n\
            1. Only return the JSON object, nothing else\n\
            2. Ensure all required fields are present\n\
            3. Follow the schema structure exactly\n\
            4. Use the correct data types for each field",
            schema_str
        ))
    }
}

impl Default for JsonModeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonOutputStrategy for JsonModeStrategy {
    fn name(&self) -> &str {
        "JsonModeStrategy"
    }

    fn apply(
        &self,
        req: &mut GenerateContentRequest,
        schema: &serde_json::Value,
    ) -> Result<(), AiError> {
        req.set_response_format(ResponseFormat::Json);

        let instruction = Self::build_json_instruction(schema)?;

        if self.use_system_instruction {
            match req.system_instruction.as_mut() {
                Some(existing) => existing.parts.push(Part::text(instruction)),
                None => req.system_instruction = Some(Content::instruction(instruction)),
            }
        } else if let Some(last_turn) = req
            .contents
            .iter_mut()
            .rev()
            .find(|c| c.role == Some(Role::User))
        {
            last_turn.parts.push(Part::text(format!("\n\n{}", instruction)));
        } else {
            req.contents.push(Content::user(instruction));
        }

        Ok(())
    }
}

/// Pick the JSON output strategy for a provider id.
pub fn detect_json_strategy(provider_id: &str) -> Box<dyn JsonOutputStrategy> {
    match provider_id {
        "gemini" | "vertex" => Box::new(ResponseSchemaStrategy::new()),

        // Unknown providers get the prompt-based fallback
        _ => Box::new(JsonModeStrategy::new()),
    }
}
