use super::LlmProvider;
use crate::errors::Error;
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Provider implementation for OpenAI's API
#[derive(Debug)]
pub struct OpenAiProvider {
    /// OpenAI API key loaded from environment
    api_key: String,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider instance; errors if the API key is
    /// not configured.
    pub fn new() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::LlmError("OPENAI_API_KEY environment variable not set".into()))?;
        Ok(OpenAiProvider { api_key })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String, Error> {
        let client = Client::new();
        let request_body = json!({
          "model": model,
          "messages": messages,
          "temperature": 0.7
        });

        let res = client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let text = res.text().await?;
            return Err(Error::LlmError(format!("OpenAI API error: {}", text)));
        }

        let json_resp: serde_json::Value = res.json().await?;
        if let Some(content) = json_resp["choices"][0]["message"]["content"].as_str() {
            Ok(content.trim().to_string())
        } else {
            Err(Error::LlmError(
                "No content in OpenAI LLM response".to_string(),
            ))
        }
    }
}
