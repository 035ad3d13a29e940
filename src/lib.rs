pub mod cli;
pub mod llm;
pub mod models;
pub mod server;

use cli::Args;
use llm::chat::new_provider;
use llm::ProviderConfig;
use log::{ info, warn };
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Provider: {}", args.chat_provider.as_deref().unwrap_or("(none)"));
    info!("Chat Endpoint: {}", args.chat_api_url.as_deref().unwrap_or("(none)"));
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("(provider default)"));
    info!("Max Tokens: {}", args.max_tokens);
    info!("-------------------------");

    if args.chat_api_key.is_empty() {
        warn!("CHAT_API_KEY not set. Set it in .env to talk to a real provider.");
    }
    if args.chat_provider.is_none() && args.chat_api_url.is_none() {
        warn!("No chat provider configured; replies will come from the built-in mock.");
    }

    let config = ProviderConfig::from_args(&args)?;
    let provider = new_provider(&config)?;
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, provider, args);
    server.run().await?;

    Ok(())
}
