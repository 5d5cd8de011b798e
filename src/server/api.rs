use crate::agent::CookingAgent;
use crate::history::{ HistoryError, DEFAULT_CONVERSATION };
use crate::models::api::{
    BackendStatus,
    ChatResponse,
    ErrorResponse,
    HealthResponse,
    InfoResponse,
    MessageResponse,
    ResetQuery,
};
use crate::models::chat::now_iso;
use std::any::Any;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, Query },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde_json::Value;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ self, CorsLayer };
use log::{ info, warn, error };

#[derive(Clone)]
struct AppState {
    agent: Arc<CookingAgent>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Message is required")]
    MessageRequired,
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Server error: {0}")]
    Internal(String),
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match self {
            ApiError::MessageRequired | ApiError::EmptyMessage => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            ApiError::Internal(_) => error!("{}", self),
            _ => warn!("Rejected chat request: {}", self),
        }
        (code, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Validated chat input: trimmed message plus the conversation it belongs to.
#[derive(Debug, PartialEq, Eq)]
pub struct ChatInput {
    pub message: String,
    pub conversation_id: String,
}

/// An absent body reads as a missing message. A body that is present but not JSON is a
/// server error, as is a `message` that is not a string.
pub fn parse_chat_body(body: &[u8]) -> Result<ChatInput, ApiError> {
    if body.trim_ascii().is_empty() {
        return Err(ApiError::MessageRequired);
    }
    let data: Value = serde_json
        ::from_slice(body)
        .map_err(|e| ApiError::Internal(format!("invalid JSON body: {}", e)))?;
    let raw = data.get("message").ok_or(ApiError::MessageRequired)?;
    let message = raw
        .as_str()
        .ok_or_else(|| ApiError::Internal(format!("'message' must be a string, got {}", raw)))?
        .trim();
    if message.is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    let conversation_id = data
        .get("session_id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CONVERSATION);

    Ok(ChatInput {
        message: message.to_string(),
        conversation_id: conversation_id.to_string(),
    })
}

pub fn router(agent: Arc<CookingAgent>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/reset", post(reset_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer)
        .with_state(AppState { agent })
}

pub async fn start_http_server(
    addr: &str,
    agent: Arc<CookingAgent>
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener
        ::bind(addr).await
        .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e))?;
    info!("API will be accessible at: http://{}", addr);

    axum::serve(listener, router(agent).into_make_service()).await?;
    Ok(())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(detail).into_response()
}

async fn info_handler() -> impl IntoResponse {
    let endpoints = BTreeMap::from([
        ("/chat".to_string(), "POST - Send a message to the chatbot".to_string()),
        ("/health".to_string(), "GET - Check API health".to_string()),
        ("/reset".to_string(), "POST - Reset conversation history".to_string()),
    ]);
    Json(InfoResponse {
        message: "Cooking Recipe Chatbot API is running!".to_string(),
        endpoints,
    })
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ollama_status = BackendStatus::from(state.agent.backend_reachable().await);
    if ollama_status == BackendStatus::Disconnected {
        warn!("Health check: Ollama backend unreachable");
    }
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now_iso(),
        ollama_status,
        model: state.agent.model(),
    })
}

async fn chat_handler(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatResponse>, ApiError> {
    let input = parse_chat_body(&body)?;
    let reply = state.agent.process_message(&input.conversation_id, &input.message).await?;
    info!(
        "Chat in conversation {}: {} chars in, {} chars out{}",
        input.conversation_id,
        input.message.len(),
        reply.text().len(),
        if reply.is_failure() { " (backend failure)" } else { "" }
    );

    Ok(
        Json(ChatResponse {
            user_message: input.message,
            bot_response: reply.text(),
            timestamp: now_iso(),
        })
    )
}

async fn reset_handler(
    State(state): State<AppState>,
    Query(query): Query<ResetQuery>
) -> Result<Json<MessageResponse>, ApiError> {
    let conversation_id = query.session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CONVERSATION);
    state.agent.reset(conversation_id).await?;
    Ok(
        Json(MessageResponse {
            message: "Conversation history reset successfully".to_string(),
        })
    )
}
