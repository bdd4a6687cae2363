//! In-memory provider for runtime tests.

use crate::error::AiError;
use crate::provider::{GenerateContentStream, Provider};
use crate::types::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
enum Scripted {
    Once(Result<GenerateContentResponse, AiError>),
    Chunks(Vec<Result<GenerateContentResponse, AiError>>),
}

/// Replays queued replies in order and records every request it receives.
#[derive(Debug, Default)]
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Arc<Mutex<Vec<GenerateContentRequest>>>,
}

pub(crate) fn text_response(text: &str) -> GenerateContentResponse {
    serde_json::from_value(serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 6, "totalTokenCount": 10}
    }))
    .expect("valid response fixture")
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply_text(self, text: &str) -> Self {
        self.reply(Ok(text_response(text)))
    }

    pub(crate) fn reply(self, reply: Result<GenerateContentResponse, AiError>) -> Self {
        self.replies.lock().unwrap().push_back(Scripted::Once(reply));
        self
    }

    pub(crate) fn reply_chunks(self, chunks: &[&str]) -> Self {
        self.reply_stream(chunks.iter().map(|c| Ok(text_response(c))).collect())
    }

    pub(crate) fn reply_stream(self, chunks: Vec<Result<GenerateContentResponse, AiError>>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted::Chunks(chunks));
        self
    }

    /// Handle onto the recorded requests that outlives the provider move
    pub(crate) fn requests(&self) -> Arc<Mutex<Vec<GenerateContentRequest>>> {
        self.requests.clone()
    }

    fn next(&self, req: GenerateContentRequest) -> Result<Scripted, AiError> {
        self.requests.lock().unwrap().push(req);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AiError::provider("no scripted reply left"))
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        Arc::new(ProviderInfo {
            id: "gemini".to_string(),
            name: "Scripted".to_string(),
        })
    }

    async fn generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        match self.next(req)? {
            Scripted::Once(reply) => reply,
            Scripted::Chunks(_) => Err(AiError::provider("expected a streaming call")),
        }
    }

    async fn stream_generate_content(
        &self,
        req: GenerateContentRequest,
    ) -> Result<Box<GenerateContentStream>, AiError> {
        let chunks = match self.next(req)? {
            Scripted::Chunks(chunks) => chunks,
            Scripted::Once(reply) => vec![Ok(reply?)],
        };
        Ok(Box::new(futures::stream::iter(chunks)))
    }
}
