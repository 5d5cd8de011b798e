pub mod chat;

use serde::{ Deserialize, Serialize };
use std::time::Duration;
use thiserror::Error;
use crate::cli::Args;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma3:1b";

/// Sampling parameters forwarded verbatim as Ollama `options`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self { temperature: 0.7, top_p: 0.9, num_predict: 500 }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub options: SamplingOptions,
    pub chat_timeout: Duration,
    pub probe_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            options: SamplingOptions::default(),
            chat_timeout: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

impl LlmConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            base_url: args.ollama_base_url.clone(),
            model: args.ollama_model.clone(),
            options: SamplingOptions {
                temperature: args.temperature,
                top_p: args.top_p,
                num_predict: args.num_predict,
            },
            chat_timeout: Duration::from_secs(args.chat_timeout_secs),
            probe_timeout: Duration::from_secs(args.health_timeout_secs),
        }
    }
}

/// Why a chat completion produced no reply. The `Display` text is what callers
/// see in place of a reply.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP Error: {status} - {body}")]
    Http {
        status: u16,
        body: String,
    },
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            InferenceError::Connection(err.to_string())
        } else {
            InferenceError::Unexpected(err.to_string())
        }
    }
}
