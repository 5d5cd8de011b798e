pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod llm;
pub mod cli;
pub mod history;

use agent::CookingAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Ollama Base URL: {}", args.ollama_base_url);
    info!("Ollama Model: {}", args.ollama_model);
    info!("History Window: {} exchanges", args.history_window);
    match args.history_capacity {
        Some(cap) => info!("History Capacity: {}", cap),
        None => info!("History Capacity: unbounded"),
    }
    info!("Record Failed Replies: {}", args.record_failed_replies);
    info!(
        "System Prompt: {}",
        args.system_prompt_path.as_deref().unwrap_or("built-in cooking prompt")
    );
    info!("-------------------------");
    info!("Run 'ollama list' to ensure the model is available.");

    let agent = Arc::new(CookingAgent::new(&args)?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent);
    server.run().await?;

    Ok(())
}
