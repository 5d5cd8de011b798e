pub mod ollama;

use async_trait::async_trait;
use std::sync::Arc;
use super::{ InferenceError, LlmConfig };
use self::ollama::OllamaClient;
use crate::models::chat::ChatMessage;

/// Reply used when the backend answers 200 without any message content.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One non-streaming completion over `messages`. Single attempt, no retry.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, InferenceError>;

    /// Liveness of the backend. Every failure maps to `false`.
    async fn probe(&self) -> bool;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Arc<dyn ChatClient> {
    Arc::new(OllamaClient::from_config(config))
}
