use crate::cli::Args;
use crate::config::prompt::load_system_prompt;
use crate::history::{ history_to_messages, initialize_history_store, HistoryError, HistoryStore };
use crate::llm::{ InferenceError, LlmConfig };
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::models::chat::{ ChatMessage, Exchange };

use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;

const DEFAULT_HISTORY_WINDOW: usize = 5;

/// Outcome of one chat turn.
#[derive(Debug)]
pub enum Reply {
    Answer(String),
    Failed(InferenceError),
}

impl Reply {
    /// Text shown to the caller. Failures read as their error description.
    pub fn text(&self) -> String {
        match self {
            Reply::Answer(text) => text.clone(),
            Reply::Failed(e) => e.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failed(_))
    }
}

#[derive(Clone)]
pub struct CookingAgent {
    chat_client: Arc<dyn ChatClient>,
    history_store: Arc<dyn HistoryStore>,
    system_prompt: Arc<str>,
    history_window: usize,
    record_failed_replies: bool,
}

impl CookingAgent {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let llm_config = LlmConfig::from_args(args);
        let chat_client = new_chat_client(&llm_config);
        info!(
            "Chat client configured: Model={}, BaseURL={}",
            chat_client.get_model(),
            chat_client.get_base_url()
        );

        let system_prompt = load_system_prompt(args.system_prompt_path.as_deref())?;
        let history_store = initialize_history_store(args);

        Ok(
            Self::with_components(chat_client, history_store, system_prompt)
                .with_history_window(args.history_window)
                .with_failed_replies_recorded(args.record_failed_replies)
        )
    }

    pub fn with_components(
        chat_client: Arc<dyn ChatClient>,
        history_store: Arc<dyn HistoryStore>,
        system_prompt: impl Into<String>
    ) -> Self {
        Self {
            chat_client,
            history_store,
            system_prompt: Arc::from(system_prompt.into()),
            history_window: DEFAULT_HISTORY_WINDOW,
            record_failed_replies: true,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_failed_replies_recorded(mut self, record: bool) -> Self {
        self.record_failed_replies = record;
        self
    }

    pub fn model(&self) -> String {
        self.chat_client.get_model()
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history_store
    }

    pub async fn backend_reachable(&self) -> bool {
        self.chat_client.probe().await
    }

    /// System prompt, the recent window of the conversation, then `message`.
    pub async fn build_messages(
        &self,
        conversation_id: &str,
        message: &str
    ) -> Result<Vec<ChatMessage>, HistoryError> {
        let recent = self.history_store.recent(conversation_id, self.history_window).await?;
        let mut messages = Vec::with_capacity(recent.len() * 2 + 2);
        messages.push(ChatMessage::system(&*self.system_prompt));
        messages.extend(history_to_messages(&recent));
        messages.push(ChatMessage::user(message));
        Ok(messages)
    }

    /// `message` must already be trimmed and non-empty.
    pub async fn process_message(
        &self,
        conversation_id: &str,
        message: &str
    ) -> Result<Reply, HistoryError> {
        let messages = self.build_messages(conversation_id, message).await?;

        let reply = match self.chat_client.chat(&messages).await {
            Ok(content) => Reply::Answer(content),
            Err(e) => {
                warn!("LLM interaction error in conversation {}: {}", conversation_id, e);
                Reply::Failed(e)
            }
        };

        if !reply.is_failure() || self.record_failed_replies {
            self.history_store.append(conversation_id, Exchange::new(message, reply.text())).await?;
        }

        Ok(reply)
    }

    pub async fn reset(&self, conversation_id: &str) -> Result<(), HistoryError> {
        self.history_store.clear(conversation_id).await?;
        info!("Conversation {} reset", conversation_id);
        Ok(())
    }
}
