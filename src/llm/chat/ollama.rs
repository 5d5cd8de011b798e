use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use async_trait::async_trait;
use std::time::Duration;
use log::{ debug, warn };
use super::{ ChatClient, FALLBACK_REPLY };
use crate::llm::{ InferenceError, LlmConfig, SamplingOptions };
use crate::models::chat::ChatMessage;

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
    options: SamplingOptions,
    chat_timeout: Duration,
    probe_timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: SamplingOptions,
}

/// Pulls `message.content` out of a chat response. A missing `message` or `content`
/// gives the fallback reply; a `message` that is not an object is malformed.
fn extract_content(data: &Value) -> Result<String, InferenceError> {
    let message = match data.get("message") {
        None => return Ok(FALLBACK_REPLY.to_string()),
        Some(Value::Object(message)) => message,
        Some(other) => {
            return Err(InferenceError::Unexpected(format!("'message' is not an object: {}", other)));
        }
    };
    match message.get("content") {
        None | Some(Value::Null) => Ok(FALLBACK_REPLY.to_string()),
        Some(Value::String(content)) => Ok(content.clone()),
        Some(other) => Err(InferenceError::Unexpected(format!("'content' is not a string: {}", other))),
    }
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, completion_model: impl Into<String>) -> Self {
        Self::from_config(&LlmConfig {
            base_url: base_url.into(),
            model: completion_model.into(),
            ..LlmConfig::default()
        })
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            completion_model: config.model.clone(),
            options: config.options,
            chat_timeout: config.chat_timeout,
            probe_timeout: config.probe_timeout,
        }
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, InferenceError> {
        let url = self.url("/api/chat");
        let req = ChatRequest {
            model: &self.completion_model,
            messages,
            stream: false,
            options: self.options,
        };
        debug!("POST {} with {} messages", url, messages.len());

        let resp = self.http.post(&url).json(&req).timeout(self.chat_timeout).send().await?;

        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Ollama returned {} for {}", status, url);
            return Err(InferenceError::Http { status: status.as_u16(), body });
        }

        let body = resp.text().await?;
        let data: Value = serde_json
            ::from_str(&body)
            .map_err(|e| InferenceError::Unexpected(format!("invalid chat response: {}", e)))?;

        extract_content(&data)
    }

    async fn probe(&self) -> bool {
        let url = self.url("/api/version");
        match self.http.get(&url).timeout(self.probe_timeout).send().await {
            Ok(resp) => {
                debug!("Ollama probe {} -> {}", url, resp.status());
                resp.status() == reqwest::StatusCode::OK
            }
            Err(e) => {
                debug!("Ollama probe {} failed: {}", url, e);
                false
            }
        }
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{ body_partial_json, method, path };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::system("be a chef"), ChatMessage::user("How do I boil an egg?")]
    }

    #[tokio::test]
    async fn chat_sends_non_streaming_request_with_options() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(
                body_partial_json(
                    json!({
                "model": "gemma3:1b",
                "stream": false,
                "options": { "num_predict": 500 },
                "messages": [
                    { "role": "system", "content": "be a chef" },
                    { "role": "user", "content": "How do I boil an egg?" }
                ]
            })
                )
            )
            .respond_with(
                ResponseTemplate::new(200).set_body_json(
                    json!({
                "message": { "role": "assistant", "content": "Place eggs in water..." },
                "done": true
            })
                )
            )
            .expect(1)
            .mount(&server).await;

        let client = OllamaClient::new(server.uri(), "gemma3:1b");
        let reply = client.chat(&messages()).await.unwrap();
        assert_eq!(reply, "Place eggs in water...");
    }

    #[tokio::test]
    async fn missing_content_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
            .mount(&server).await;

        let client = OllamaClient::new(server.uri(), "gemma3:1b");
        assert_eq!(client.chat(&messages()).await.unwrap(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn http_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model is loading"))
            .mount(&server).await;

        let client = OllamaClient::new(server.uri(), "gemma3:1b");
        let err = client.chat(&messages()).await.unwrap_err();
        match &err {
            InferenceError::Http { status, body } => {
                assert_eq!(*status, 503);
                assert_eq!(body, "model is loading");
            }
            other => panic!("expected http error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "HTTP Error: 503 - model is loading");
    }

    #[tokio::test]
    async fn null_message_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": null })))
            .mount(&server).await;

        let client = OllamaClient::new(server.uri(), "gemma3:1b");
        let err = client.chat(&messages()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Unexpected(_)), "{err:?}");
    }

    #[test]
    fn content_extraction_edges() {
        assert_eq!(extract_content(&json!({})).unwrap(), FALLBACK_REPLY);
        assert_eq!(extract_content(&json!({ "message": {} })).unwrap(), FALLBACK_REPLY);
        assert_eq!(
            extract_content(&json!({ "message": { "content": null } })).unwrap(),
            FALLBACK_REPLY
        );
        assert_eq!(extract_content(&json!({ "message": { "content": "" } })).unwrap(), "");
        assert!(extract_content(&json!({ "message": "hi" })).is_err());
        assert!(extract_content(&json!({ "message": { "content": 7 } })).is_err());
    }

    #[tokio::test]
    async fn garbage_body_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server).await;

        let client = OllamaClient::new(server.uri(), "gemma3:1b");
        let err = client.chat(&messages()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Unexpected(_)), "{err:?}");
        assert!(err.to_string().starts_with("Unexpected error: "));
    }

    #[tokio::test]
    async fn unreachable_backend_is_connection_error() {
        let client = OllamaClient::new("http://127.0.0.1:1", "gemma3:1b");
        let err = client.chat(&messages()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Connection(_)), "{err:?}");
        assert!(err.to_string().starts_with("Connection error: "));
    }

    #[tokio::test]
    async fn chat_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server).await;

        let client = OllamaClient::from_config(
            &(LlmConfig {
                base_url: server.uri(),
                chat_timeout: Duration::from_millis(50),
                ..LlmConfig::default()
            })
        );
        let err = client.chat(&messages()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Connection(_)), "{err:?}");
    }

    #[tokio::test]
    async fn probe_reports_version_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "0.6.2" })))
            .mount(&server).await;

        let client = OllamaClient::new(format!("{}/", server.uri()), "gemma3:1b");
        assert!(client.probe().await);
        assert!(!OllamaClient::new("http://127.0.0.1:1", "gemma3:1b").probe().await);
    }

    #[tokio::test]
    async fn slow_version_endpoint_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "version": "0.6.2" }))
                    .set_delay(Duration::from_millis(800))
            )
            .mount(&server).await;

        let client = OllamaClient::from_config(
            &(LlmConfig {
                base_url: server.uri(),
                probe_timeout: Duration::from_millis(100),
                ..LlmConfig::default()
            })
        );
        assert!(!client.probe().await);
    }

    #[tokio::test]
    async fn probe_non_200_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server).await;

        let client = OllamaClient::new(server.uri(), "gemma3:1b");
        assert!(!client.probe().await);
    }
}
