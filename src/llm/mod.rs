//! Model client abstraction.
//!
//! The agent loop only needs a text-in/text-out call: a model identity plus a
//! list of prompt parts goes in, response text (or nothing) comes out.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

/// Placeholder used as the thought when the model produced nothing.
pub const NO_RESPONSE: &str = "No response from Gemini";

/// A language model that turns a prompt into response text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response for `prompt` using `model`.
    ///
    /// `Ok(None)` means the model answered without any text.
    async fn generate(&self, model: &str, prompt: &[String]) -> anyhow::Result<Option<String>>;
}
