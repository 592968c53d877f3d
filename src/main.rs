//! ReAct Agent - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the agent API.

use std::sync::Arc;

use react_agent::{agent::Agent, api, config::Config, llm::GeminiClient, tools};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "react_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, max_iterations={}",
        config.model, config.max_iterations
    );

    let llm = Arc::new(GeminiClient::new(config.api_key.clone()));
    let registry = tools::default_registry(config.serp_api_key.clone());
    let agent = Agent::from_config(&config, llm, registry)?;
    info!("Registered tools: {}", agent.tools().prompt_list());

    api::serve(&config, Arc::new(agent)).await?;

    Ok(())
}
