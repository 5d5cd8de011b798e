use async_trait::async_trait;
use std::collections::{ HashMap, VecDeque };
use tokio::sync::RwLock;
use log::debug;
use crate::history::{ HistoryError, HistoryStore };
use crate::models::chat::Exchange;

/// Process-local history. Lost on restart.
pub struct InMemoryHistoryStore {
    conversations: RwLock<HashMap<String, VecDeque<Exchange>>>,
    capacity: Option<usize>,
}

impl InMemoryHistoryStore {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
            capacity: capacity.filter(|c| *c > 0),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, conversation_id: &str, exchange: Exchange) -> Result<(), HistoryError> {
        let mut conversations = self.conversations.write().await;
        let entries = conversations.entry(conversation_id.to_string()).or_default();
        entries.push_back(exchange);
        if let Some(cap) = self.capacity {
            while entries.len() > cap {
                entries.pop_front();
            }
        }
        debug!("Conversation {} now holds {} exchanges", conversation_id, entries.len());
        Ok(())
    }

    async fn recent(
        &self,
        conversation_id: &str,
        limit: usize
    ) -> Result<Vec<Exchange>, HistoryError> {
        let conversations = self.conversations.read().await;
        let Some(entries) = conversations.get(conversation_id) else {
            return Ok(Vec::new());
        };
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.iter().skip(skip).cloned().collect())
    }

    async fn clear(&self, conversation_id: &str) -> Result<(), HistoryError> {
        self.conversations.write().await.remove(conversation_id);
        Ok(())
    }

    async fn len(&self, conversation_id: &str) -> Result<usize, HistoryError> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(conversation_id).map_or(0, VecDeque::len))
    }
}
