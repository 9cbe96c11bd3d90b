use tracing::{debug, warn};

use crate::config::Settings;
use crate::errors::Error;
use crate::llm::providers::{anthropic::AnthropicProvider, openai::OpenAiProvider, LlmProvider};
use crate::llm::ChatMessage;

/// Notice returned instead of model output when no API key is configured,
/// so the pipeline stays runnable end to end without credentials.
pub const LLM_DISABLED_NOTICE: &str = "LLM disabled. Set an API key to enable model output.";

/// Generic LLM client that delegates work to a concrete provider.
#[derive(Debug)]
pub struct LlmClient {
    provider: Option<Box<dyn LlmProvider>>,
}

impl LlmClient {
    /// Builds the client for the configured provider name. A missing API key
    /// or unknown provider yields a disabled client rather than a startup
    /// failure.
    pub fn from_settings(settings: &Settings) -> Self {
        let provider: Option<Box<dyn LlmProvider>> = match settings.llm_provider.as_str() {
            "openai" => match OpenAiProvider::new() {
                Ok(p) => Some(Box::new(p)),
                Err(err) => {
                    warn!("OpenAI provider unavailable: {}", err);
                    None
                }
            },
            "anthropic" => match AnthropicProvider::new() {
                Ok(p) => Some(Box::new(p)),
                Err(err) => {
                    warn!("Anthropic provider unavailable: {}", err);
                    None
                }
            },
            other => {
                warn!("Unknown LLM provider '{}'", other);
                None
            }
        };

        if provider.is_none() {
            warn!("LLM client disabled; model calls will return a fixed notice");
        }
        LlmClient { provider }
    }

    /// Client backed by an explicit provider. Used by tests to stub model
    /// output; also the seam for embedding this crate with a custom backend.
    pub fn with_provider(provider: Box<dyn LlmProvider>) -> Self {
        LlmClient {
            provider: Some(provider),
        }
    }

    pub fn disabled() -> Self {
        LlmClient { provider: None }
    }

    pub fn enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Runs one instruction/input completion against the given model and
    /// returns the trimmed response text.
    pub async fn complete(
        &self,
        model: &str,
        instruction: &str,
        input_text: &str,
    ) -> Result<String, Error> {
        let Some(provider) = &self.provider else {
            return Ok(LLM_DISABLED_NOTICE.to_string());
        };

        let messages = vec![
            ChatMessage::new("system", instruction),
            ChatMessage::new("user", input_text),
        ];
        debug!(model, "Calling LLM");
        let response = provider.complete(model, messages).await?;
        Ok(response.trim().to_string())
    }
}
