//! Manual check for OpenAiProvider chat completion.
//!
//! Run with: cargo run -p openai-provider --example test_chat
//! Or with a custom message: cargo run -p openai-provider --example test_chat -- "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - API key for authentication

use openai_provider::{GenerationRequest, OpenAiProvider, Provider};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Hello! Please respond with a short greeting.".to_string()
    };

    let provider = OpenAiProvider::from_env()?;

    println!("Provider: {}", provider.name());
    println!("API URL: {}", provider.config().api_url);
    println!("Model: {}", provider.config().model);

    if !provider.probe().await {
        println!("OPENAI_API_KEY is not set; provider unavailable.");
        return Ok(());
    }

    let request = GenerationRequest::new(
        "You are a warm, concise healthcare assistant.",
        &message_text,
    );

    println!("Sending: \"{}\"", message_text);
    println!("Waiting for response...\n");

    let reply = provider.generate(&request).await?;

    println!("=== Response ===");
    println!("{}", reply);
    println!("================");

    Ok(())
}
