//! Stateful chat sessions.

use crate::error::AiError;
use crate::provider::Provider;
use crate::types::*;
use futures::{Stream, StreamExt};
use std::sync::Arc;

/// A multi-turn conversation.
///
/// The session keeps its own history and replays it on every turn. The
/// system instruction and temperature are fixed at construction. Turns are
/// only recorded once the model answers with text, so a failed or empty
/// reply leaves the history untouched.
#[derive(Debug)]
pub struct ChatSession {
    id: String,
    provider: Arc<dyn Provider>,
    model: String,
    config: ChatConfig,
    history: Vec<Content>,
}

impl ChatSession {
    /// Create a session with empty history
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, config: ChatConfig) -> Self {
        let session = Self {
            id: uuid::Uuid::new_v4().to_string(),
            provider,
            model: model.into(),
            config,
            history: Vec::new(),
        };

        tracing::debug!(
            session_id = %session.id,
            model = %session.model,
            temperature = ?session.config.temperature,
            "chat session created"
        );

        session
    }

    /// Resume from an existing history
    pub fn with_history(mut self, history: Vec<Content>) -> Self {
        self.history = history;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Recorded turns, alternating user and model
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    fn build_request(&self, turn: &Content) -> GenerateContentRequest {
        let mut contents = self.history.clone();
        contents.push(turn.clone());

        let mut req = GenerateContentRequest::new(self.model.clone(), contents);
        if let Some(instruction) = &self.config.system_instruction {
            req = req.with_system_instruction(instruction.clone());
        }
        if let Some(temperature) = self.config.temperature {
            req = req.with_temperature(temperature);
        }
        req
    }

    /// Send a text message and wait for the full reply
    pub async fn send_message(&mut self, message: impl Into<String>) -> Result<TextResult, AiError> {
        self.send_parts(vec![Part::text(message)]).await
    }

    /// Send a turn made of arbitrary parts (text, inline images)
    pub async fn send_parts(&mut self, parts: Vec<Part>) -> Result<TextResult, AiError> {
        let turn = Content::new(Role::User, parts);
        let req = self.build_request(&turn);

        tracing::debug!(
            session_id = %self.id,
            history = self.history.len(),
            "sending chat turn"
        );

        let response = self.provider.generate_content(req).await?;
        let result = TextResult::from_response(&self.model, &response);

        match (&result.content, response.first_content()) {
            (Generated::Value(_), Some(reply)) => {
                let mut reply = reply.clone();
                reply.role = Some(Role::Model);
                self.history.push(turn);
                self.history.push(reply);
            }
            _ => {
                tracing::warn!(
                    session_id = %self.id,
                    finish_reason = ?result.finish_reason,
                    "chat turn produced no text; history unchanged"
                );
            }
        }

        Ok(result)
    }

    /// Send a text message and stream the reply
    ///
    /// The stream borrows the session; the turn is added to history once the
    /// stream has been driven to completion with non-empty text.
    pub async fn send_message_stream(
        &mut self,
        message: impl Into<String>,
    ) -> Result<impl Stream<Item = Result<TextChunk, AiError>> + Send + '_, AiError> {
        let turn = Content::user(message);
        let req = self.build_request(&turn);
        let mut inner = self.provider.stream_generate_content(req).await?;

        let session_id = self.id.clone();
        let history = &mut self.history;

        Ok(async_stream::try_stream! {
            let mut reply = String::new();

            while let Some(chunk) = inner.next().await {
                let piece = TextChunk::from_response(&chunk?);
                reply.push_str(&piece.delta);
                yield piece;
            }

            if reply.is_empty() {
                tracing::warn!(session_id = %session_id, "streamed chat turn produced no text");
            } else {
                history.push(turn);
                history.push(Content::model(reply));
            }
        })
    }
}
