use crate::errors::Error;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod anthropic;
pub mod openai;

/// A chat-completion backend. The model is chosen per call because the
/// pipeline uses different tiers for summarizing, analyzing and writing.
#[async_trait]
pub trait LlmProvider: Debug + Send + Sync {
    async fn complete(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String, Error>;
}
