//! Client configuration.
//!
//! Nothing in this crate reads the process environment implicitly. Callers
//! build a [`TutorConfig`] themselves or ask for one from the environment.

use crate::provider::GeminiProvider;
use medtutor_core::error::AiError;
use std::time::Duration;

/// Variable holding the API credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Variable overriding the model name
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Variable overriding the service base URL
pub const API_BASE_ENV: &str = "GEMINI_API_BASE";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Credential and endpoint settings for the tutor
#[derive(Clone)]
pub struct TutorConfig {
    api_key: String,
    model: String,
    api_base: Option<String>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for TutorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorConfig")
            .field("api_key_set", &!self.api_key.is_empty())
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TutorConfig {
    /// Create a config with the given credential and the default model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: None,
            timeout: None,
        }
    }

    /// Set model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    /// Load from the process environment
    ///
    /// Fails with [`AiError::MissingCredential`] when `GEMINI_API_KEY` is
    /// unset or empty.
    pub fn from_env() -> Result<Self, AiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from the process environment, tolerating a missing credential
    ///
    /// A missing key is logged as a warning and replaced by an empty string,
    /// so the failure surfaces later as an authentication error from the
    /// service.
    pub fn from_env_lenient() -> Self {
        Self::from_lookup_lenient(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AiError> {
        let api_key = non_empty(lookup(API_KEY_ENV))
            .ok_or_else(|| AiError::missing_credential(API_KEY_ENV))?;
        Ok(Self::new(api_key).with_overrides(&lookup))
    }

    /// Lenient counterpart of [`TutorConfig::from_lookup`]
    pub fn from_lookup_lenient(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = non_empty(lookup(API_KEY_ENV)).unwrap_or_else(|| {
            tracing::warn!(
                "Missing API key. Ensure {} is set in environment.",
                API_KEY_ENV
            );
            String::new()
        });
        Self::new(api_key).with_overrides(&lookup)
    }

    fn with_overrides(mut self, lookup: &impl Fn(&str) -> Option<String>) -> Self {
        if let Some(model) = non_empty(lookup(MODEL_ENV)) {
            self.model = model;
        }
        if let Some(api_base) = non_empty(lookup(API_BASE_ENV)) {
            self.api_base = Some(api_base);
        }
        self
    }

    /// Build a Gemini provider from this config
    pub fn build_provider(&self) -> Result<GeminiProvider, AiError> {
        let mut builder = GeminiProvider::builder().api_key(self.api_key.clone());
        if let Some(api_base) = &self.api_base {
            builder = builder.api_base(api_base.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
