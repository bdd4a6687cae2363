//! Clinical tutoring operations.
//!
//! [`MedicalTutor`] is a thin adapter over a [`RuntimeExecutor`]: every call
//! builds one fixed request shape and hands it to the model. The free
//! functions at the bottom build a tutor from a [`TutorConfig`] for one-off
//! calls.

pub mod case;
pub mod imaging;
pub mod prompts;

pub use case::{case_schema, CaseRecord, Vitals};
pub use imaging::{ImageInput, JPEG_MIME_TYPE};
pub use prompts::*;

use crate::config::TutorConfig;
use crate::layer::LoggingLayer;
use medtutor_core::error::AiError;
use medtutor_core::runtime::{ChatSession, RuntimeExecutor};
use medtutor_core::types::*;
use serde_json::Value;

/// Case generation, tutor chat and image analysis against one model
#[derive(Debug)]
pub struct MedicalTutor {
    executor: RuntimeExecutor,
    model: String,
}

impl MedicalTutor {
    /// Use an already assembled executor
    pub fn new(executor: RuntimeExecutor, model: impl Into<String>) -> Self {
        Self {
            executor,
            model: model.into(),
        }
    }

    /// Gemini provider with request logging, built from `config`
    pub fn from_config(config: &TutorConfig) -> Result<Self, AiError> {
        let provider = config.build_provider()?;
        let executor = RuntimeExecutor::builder(provider)
            .layer(LoggingLayer::new())
            .finish();
        Ok(Self::new(executor, config.model()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn executor(&self) -> &RuntimeExecutor {
        &self.executor
    }

    fn case_params() -> ObjectParams {
        ObjectParams::new(vec![Content::user(CASE_PROMPT)], case_schema())
            .with_system_instruction(CASE_SYSTEM_INSTRUCTION)
    }

    /// Generate one structured clinical case
    ///
    /// Missing text, invalid JSON and JSON that does not fit [`CaseRecord`]
    /// all come back as `Generated::Empty` with the reason attached.
    pub async fn generate_case(&self) -> Result<Generated<CaseRecord>, AiError> {
        self.executor
            .generate_typed(&self.model, Self::case_params())
            .await
    }

    /// Generate one clinical case as untyped JSON
    ///
    /// Returns an empty object when the model produced no usable JSON.
    pub async fn generate_case_json(&self) -> Result<Value, AiError> {
        let result = self
            .executor
            .generate_object(&self.model, Self::case_params())
            .await?;

        Ok(result
            .object
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new())))
    }

    /// Start a tutor chat with empty history
    ///
    /// No request is sent until the first message.
    pub fn create_chat(&self) -> ChatSession {
        let config = ChatConfig::new()
            .with_system_instruction(MEDICAL_SYSTEM_PROMPT)
            .with_temperature(CHAT_TEMPERATURE);
        self.executor.start_chat(&self.model, config)
    }

    /// Analyze a clinical image
    ///
    /// A missing or empty `prompt` falls back to [`DEFAULT_IMAGE_PROMPT`].
    /// The request carries a single user turn: the image first, then the
    /// prompt.
    pub async fn analyze_image(
        &self,
        image: &ImageInput,
        prompt: Option<&str>,
    ) -> Result<Generated<String>, AiError> {
        let prompt = prompt
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_IMAGE_PROMPT);

        tracing::debug!(
            model = %self.model,
            image_bytes = image.data().len(),
            default_prompt = prompt == DEFAULT_IMAGE_PROMPT,
            "analyzing clinical image"
        );

        let turn = Content::new(Role::User, vec![image.to_part(), Part::text(prompt)]);
        let result = self
            .executor
            .generate_text(&self.model, TextParams::new(vec![turn]))
            .await?;
        Ok(result.content)
    }

    /// Analyze a clinical image, substituting [`NO_ANALYSIS_FALLBACK`] for
    /// an empty reply
    pub async fn analyze_image_text(
        &self,
        image: &ImageInput,
        prompt: Option<&str>,
    ) -> Result<String, AiError> {
        let analysis = self.analyze_image(image, prompt).await?;
        Ok(analysis.unwrap_or_else(|_| NO_ANALYSIS_FALLBACK.to_string()))
    }
}

/// Generate one clinical case as JSON (`{}` when none was produced)
pub async fn generate_medical_case(config: &TutorConfig) -> Result<Value, AiError> {
    MedicalTutor::from_config(config)?
        .generate_case_json()
        .await
}

/// Start a tutor chat session
pub fn create_medical_chat(config: &TutorConfig) -> Result<ChatSession, AiError> {
    Ok(MedicalTutor::from_config(config)?.create_chat())
}

/// Analyze a base64 JPEG, returning the fallback text when nothing came back
pub async fn analyze_medical_image(
    config: &TutorConfig,
    image_base64: impl Into<String>,
    prompt: Option<&str>,
) -> Result<String, AiError> {
    let image = ImageInput::from_base64(image_base64);
    MedicalTutor::from_config(config)?
        .analyze_image_text(&image, prompt)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medtutor_core::provider::{GenerateContentStream, Provider};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Answers every request with the same canned reply
    #[derive(Debug, Clone)]
    struct CannedProvider {
        reply: Option<String>,
        fail: bool,
        seen: Arc<Mutex<Vec<GenerateContentRequest>>>,
    }

    impl CannedProvider {
        fn text(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                fail: false,
                seen: Arc::default(),
            }
        }

        fn silent() -> Self {
            Self {
                reply: None,
                fail: false,
                seen: Arc::default(),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                fail: true,
                seen: Arc::default(),
            }
        }

        fn last_request(&self) -> GenerateContentRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }

        fn request_count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn tutor(&self) -> MedicalTutor {
            MedicalTutor::new(RuntimeExecutor::builder(self.clone()).finish(), "test-model")
        }
    }

    #[async_trait]
    impl Provider for CannedProvider {
        fn info(&self) -> Arc<ProviderInfo> {
            Arc::new(ProviderInfo {
                id: "gemini".to_string(),
                name: "Canned".to_string(),
            })
        }

        async fn generate_content(
            &self,
            req: GenerateContentRequest,
        ) -> Result<GenerateContentResponse, AiError> {
            self.seen.lock().unwrap().push(req);
            if self.fail {
                return Err(AiError::provider("upstream unavailable"));
            }

            let candidates = match &self.reply {
                Some(text) => vec![Candidate {
                    content: Some(Content::model(text.clone())),
                    finish_reason: Some(FinishReason::Stop),
                    index: Some(0),
                }],
                None => vec![],
            };
            Ok(GenerateContentResponse {
                candidates,
                ..Default::default()
            })
        }

        async fn stream_generate_content(
            &self,
            _req: GenerateContentRequest,
        ) -> Result<Box<GenerateContentStream>, AiError> {
            Err(AiError::provider("streaming not scripted"))
        }
    }

    fn sample_case() -> Value {
        json!({
            "id": "case-017",
            "title": "Crushing chest pain after cocaine use",
            "patientDemographics": "34-year-old man",
            "chiefComplaint": "Chest pain for 40 minutes",
            "history": "Smoked crack cocaine one hour before onset",
            "vitals": { "bp": "178/104", "hr": "122", "rr": "22", "temp": "37.8 C" },
            "physicalExam": "Diaphoretic, dilated pupils, clear lungs",
            "initialLabs": "Troponin pending"
        })
    }

    #[tokio::test]
    async fn case_request_has_fixed_shape() {
        let provider = CannedProvider::text(&sample_case().to_string());
        provider.tutor().generate_case_json().await.unwrap();

        let req = provider.last_request();
        assert_eq!(req.model, "test-model");
        assert_eq!(req.contents, vec![Content::user(CASE_PROMPT)]);
        assert_eq!(
            req.system_instruction,
            Some(Content::instruction(CASE_SYSTEM_INSTRUCTION))
        );

        let config = req.generation_config.unwrap();
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert_eq!(config.response_schema, Some(case_schema()));
    }

    #[tokio::test]
    async fn case_json_matches_model_output() {
        let tutor = CannedProvider::text(&sample_case().to_string()).tutor();
        assert_eq!(tutor.generate_case_json().await.unwrap(), sample_case());

        let typed = tutor.generate_case().await.unwrap().into_value().unwrap();
        assert_eq!(typed.vitals.bp, "178/104");
        assert_eq!(typed.initial_labs.as_deref(), Some("Troponin pending"));
    }

    #[tokio::test]
    async fn missing_case_text_yields_empty_object() {
        let tutor = CannedProvider::silent().tutor();
        assert_eq!(tutor.generate_case_json().await.unwrap(), json!({}));

        let typed = tutor.generate_case().await.unwrap();
        assert_eq!(typed.empty_reason(), Some(&EmptyReason::NoText));
    }

    #[tokio::test]
    async fn malformed_case_text_is_reported() {
        let tutor = CannedProvider::text("Here is your case: {").tutor();
        assert_eq!(tutor.generate_case_json().await.unwrap(), json!({}));
        assert!(matches!(
            tutor.generate_case().await.unwrap(),
            Generated::Empty(EmptyReason::MalformedJson(_))
        ));
    }

    #[tokio::test]
    async fn case_with_wrong_shape_is_malformed() {
        let tutor = CannedProvider::text(r#"{"id":"x"}"#).tutor();
        assert!(matches!(
            tutor.generate_case().await.unwrap(),
            Generated::Empty(EmptyReason::MalformedJson(_))
        ));
        assert_eq!(tutor.generate_case_json().await.unwrap(), json!({"id": "x"}));
    }

    #[test]
    fn chat_is_configured_and_sends_nothing() {
        let provider = CannedProvider::text("unused");
        let chat = provider.tutor().create_chat();

        assert!(chat.history().is_empty());
        assert_eq!(chat.model(), "test-model");
        assert_eq!(
            chat.config(),
            &ChatConfig::new()
                .with_system_instruction(MEDICAL_SYSTEM_PROMPT)
                .with_temperature(0.7)
        );
        assert_eq!(provider.request_count(), 0);
    }

    #[tokio::test]
    async fn chat_turn_carries_tutor_settings() {
        let provider = CannedProvider::text("Start with an ECG.");
        let mut chat = provider.tutor().create_chat();
        chat.send_message("Chest pain, what first?").await.unwrap();

        let req = provider.last_request();
        assert_eq!(
            req.system_instruction,
            Some(Content::instruction(MEDICAL_SYSTEM_PROMPT))
        );
        assert_eq!(req.generation_config.and_then(|c| c.temperature), Some(0.7));
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn image_request_puts_image_before_default_prompt() {
        let provider = CannedProvider::text("Right lower lobe consolidation.");
        let analysis = provider
            .tutor()
            .analyze_image(&ImageInput::from_base64("QUJD"), None)
            .await
            .unwrap();
        assert_eq!(
            analysis.value().map(String::as_str),
            Some("Right lower lobe consolidation.")
        );

        let req = provider.last_request();
        assert_eq!(req.contents.len(), 1);
        assert_eq!(req.contents[0].role, Some(Role::User));
        assert_eq!(
            req.contents[0].parts,
            vec![
                Part::inline_data("image/jpeg", "QUJD"),
                Part::text(DEFAULT_IMAGE_PROMPT),
            ]
        );
        assert!(req.system_instruction.is_none());
    }

    #[tokio::test]
    async fn empty_prompt_uses_default_and_custom_prompt_is_kept() {
        let provider = CannedProvider::text("ok");
        let tutor = provider.tutor();
        let image = ImageInput::from_base64("QUJD");

        tutor.analyze_image(&image, Some("")).await.unwrap();
        assert_eq!(
            provider.last_request().contents[0].parts[1],
            Part::text(DEFAULT_IMAGE_PROMPT)
        );

        tutor
            .analyze_image(&image, Some("Is there a pneumothorax?"))
            .await
            .unwrap();
        assert_eq!(
            provider.last_request().contents[0].parts[1],
            Part::text("Is there a pneumothorax?")
        );
    }

    #[tokio::test]
    async fn empty_analysis_uses_fallback_text() {
        let tutor = CannedProvider::silent().tutor();
        let image = ImageInput::from_base64("QUJD");

        assert!(tutor.analyze_image(&image, None).await.unwrap().is_empty());
        assert_eq!(
            tutor.analyze_image_text(&image, None).await.unwrap(),
            "No analysis generated."
        );

        let blank = CannedProvider::text("").tutor();
        assert_eq!(
            blank.analyze_image_text(&image, None).await.unwrap(),
            NO_ANALYSIS_FALLBACK
        );
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let tutor = CannedProvider::failing().tutor();
        let image = ImageInput::from_base64("QUJD");

        assert!(matches!(
            tutor.generate_case_json().await,
            Err(AiError::Provider(_))
        ));
        assert!(matches!(
            tutor.analyze_image_text(&image, None).await,
            Err(AiError::Provider(_))
        ));
        assert!(tutor.create_chat().send_message("hi").await.is_err());
    }

    #[test]
    fn from_config_uses_configured_model() {
        let config = TutorConfig::new("key").with_model("gemini-2.5-flash");
        let tutor = MedicalTutor::from_config(&config).unwrap();
        assert_eq!(tutor.model(), "gemini-2.5-flash");
        assert_eq!(tutor.executor().info().id, "gemini");

        let chat = create_medical_chat(&config).unwrap();
        assert_eq!(chat.model(), "gemini-2.5-flash");
    }
}
