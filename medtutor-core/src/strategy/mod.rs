//! Strategy layer for provider-specific behaviors.
//!
//! Currently covers how JSON output is requested (native response schema vs
//! JSON MIME type plus prompt instructions).

pub mod json_output;

pub use json_output::{
    detect_json_strategy, JsonModeStrategy, JsonOutputStrategy, ResponseSchemaStrategy,
};
