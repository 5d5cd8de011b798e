use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Ollama Backend Args ---
    /// Base URL of the Ollama server (e.g., http://localhost:11434)
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = crate::llm::DEFAULT_BASE_URL)]
    pub ollama_base_url: String,

    /// Model used for chat completion (run `ollama list` to see what is available)
    #[arg(long, env = "OLLAMA_MODEL", default_value = crate::llm::DEFAULT_MODEL)]
    pub ollama_model: String,

    /// Timeout in seconds for a single chat completion call.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "120")]
    pub chat_timeout_secs: u64,

    /// Timeout in seconds for the backend liveness probe used by /health.
    #[arg(long, env = "HEALTH_TIMEOUT_SECS", default_value = "5")]
    pub health_timeout_secs: u64,

    // --- Sampling Args ---
    /// Sampling temperature sent with every chat request.
    #[arg(long, env = "TEMPERATURE", default_value = "0.7")]
    pub temperature: f32,

    /// Nucleus sampling cutoff sent with every chat request.
    #[arg(long, env = "TOP_P", default_value = "0.9")]
    pub top_p: f32,

    /// Maximum number of tokens the model may generate (Ollama `num_predict`).
    #[arg(long, env = "NUM_PREDICT", default_value = "500")]
    pub num_predict: u32,

    // --- History Args ---
    /// Number of past exchanges replayed to the model with each new message.
    #[arg(long, env = "HISTORY_WINDOW", default_value = "5")]
    pub history_window: usize,

    /// Maximum exchanges kept per conversation. Oldest are evicted first. Unbounded if unset.
    #[arg(long, env = "HISTORY_CAPACITY")]
    pub history_capacity: Option<usize>,

    /// Store exchanges whose reply is a backend error description.
    #[arg(long, env = "RECORD_FAILED_REPLIES", default_value = "true", action = clap::ArgAction::Set)]
    pub record_failed_replies: bool,

    // --- General App Args ---
    /// Path to a text file replacing the built-in cooking system prompt.
    #[arg(long, env = "SYSTEM_PROMPT_PATH")]
    pub system_prompt_path: Option<String>,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:5000")]
    pub server_addr: String,
}
