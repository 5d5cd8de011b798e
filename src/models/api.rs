use serde::{ Serialize, Deserialize };
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug)]
pub struct InfoResponse {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Connected,
    Disconnected,
}

impl From<bool> for BackendStatus {
    fn from(reachable: bool) -> Self {
        if reachable { BackendStatus::Connected } else { BackendStatus::Disconnected }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub ollama_status: BackendStatus,
    pub model: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub user_message: String,
    pub bot_response: String,
    pub timestamp: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct ResetQuery {
    pub session_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
