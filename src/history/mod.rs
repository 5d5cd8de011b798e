mod memory;

pub use memory::InMemoryHistoryStore;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use thiserror::Error;
use crate::cli::Args;
use crate::models::chat::{ ChatMessage, Exchange };

/// Conversation used when a caller does not name one.
pub const DEFAULT_CONVERSATION: &str = "default";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, conversation_id: &str, exchange: Exchange) -> Result<(), HistoryError>;

    /// Last `limit` exchanges, oldest first.
    async fn recent(
        &self,
        conversation_id: &str,
        limit: usize
    ) -> Result<Vec<Exchange>, HistoryError>;

    async fn clear(&self, conversation_id: &str) -> Result<(), HistoryError>;

    async fn len(&self, conversation_id: &str) -> Result<usize, HistoryError>;
}

pub fn initialize_history_store(args: &Args) -> Arc<dyn HistoryStore> {
    match args.history_capacity {
        Some(cap) => info!("Chat history kept in memory, at most {} exchanges per conversation", cap),
        None => info!("Chat history kept in memory, unbounded"),
    }
    Arc::new(InMemoryHistoryStore::new(args.history_capacity))
}

/// Expands stored exchanges into alternating user/assistant messages.
pub fn history_to_messages(exchanges: &[Exchange]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(exchanges.len() * 2);
    for exchange in exchanges {
        messages.push(ChatMessage::user(exchange.user.as_str()));
        messages.push(ChatMessage::assistant(exchange.bot.as_str()));
    }
    messages
}
