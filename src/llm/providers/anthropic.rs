use super::LlmProvider;
use crate::errors::Error;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Provider implementation for Anthropic's API
#[derive(Debug)]
pub struct AnthropicProvider {
    /// Anthropic API key loaded from environment
    api_key: String,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider instance; errors if the API key is
    /// not configured.
    pub fn new() -> Result<Self, Error> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            Error::LlmError("ANTHROPIC_API_KEY environment variable not set".into())
        })?;
        Ok(AnthropicProvider { api_key })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String, Error> {
        let client = Client::new();

        // The messages API takes system content as a top-level field.
        let (system_messages, user_messages): (Vec<_>, Vec<_>) =
            messages.into_iter().partition(|msg| msg.role == "system");
        let system_content = system_messages
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n");

        let request_body = json!({
            "model": model,
            "system": system_content,
            "max_tokens": 4096,
            "messages": user_messages
        });

        let res = client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", self.api_key.to_string())
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let text = res.text().await?;
            return Err(Error::LlmError(format!("Anthropic API error: {}", text)));
        }

        let json_resp: serde_json::Value = res.json().await?;
        if let Some(content) = json_resp["content"][0]["text"].as_str() {
            debug!("Anthropic response: {}", content);
            Ok(content.trim().to_string())
        } else {
            Err(Error::LlmError(
                "No content in Anthropic LLM response".to_string(),
            ))
        }
    }
}
