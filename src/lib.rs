//! # ReAct Agent
//!
//! A reasoning-and-acting loop that answers questions with search tools.
//!
//! This library provides:
//! - The agent loop: prompt rendering, response parsing and tool dispatch
//! - Search tools for Wikipedia and Google (via SerpAPI)
//! - A Gemini model client
//! - An HTTP API that streams iteration records as server-sent events
//!
//! ## Architecture
//!
//! The agent follows the ReAct pattern:
//! 1. Render the prompt with the query, conversation history and tool list
//! 2. Ask the model for a JSON thought: either a tool action or an answer
//! 3. Run the requested tool and append its observation to the history
//! 4. Repeat until the model answers or the iteration budget runs out
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use react_agent::{agent::Agent, config::Config, llm::GeminiClient, tools};
//!
//! let config = Config::from_env()?;
//! let llm = Arc::new(GeminiClient::new(config.api_key.clone()));
//! let agent = Agent::from_config(&config, llm, tools::default_registry(config.serp_api_key.clone()))?;
//! let records = agent.execute("What is the age of the oldest tree in Brazil?").await;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod tools;

pub use agent::{Agent, IterationRecord};
pub use config::Config;
