use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::Config;

const ANALYSIS_PROMPT: &str = "Analyze the following leave request reason and provide a brief \
                               analysis of its appropriateness and potential impact: ";
const MAX_COMPLETION_TOKENS: u32 = 150;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// No backend configured. Submissions proceed without an annotation.
    #[error("advisory backend disabled")]
    Disabled,

    #[error("advisor transport: {0}")]
    Transport(String),

    #[error("advisor response malformed: {0}")]
    Malformed(String),
}

/// Free-text analysis backend. Implementations must never block a leave
/// submission; the engine enforces a timeout around every call.
#[async_trait]
pub trait TextAdvisor: Send + Sync {
    async fn advise(&self, text: &str) -> Result<String, AdvisorError>;
}

/// Wired in when no API key is configured.
pub struct DisabledAdvisor;

#[async_trait]
impl TextAdvisor for DisabledAdvisor {
    async fn advise(&self, _text: &str) -> Result<String, AdvisorError> {
        Err(AdvisorError::Disabled)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Client for any OpenAI-compatible chat completion endpoint.
pub struct OpenAiAdvisor {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdvisor {
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdvisorError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl TextAdvisor for OpenAiAdvisor {
    async fn advise(&self, text: &str) -> Result<String, AdvisorError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("{ANALYSIS_PROMPT}{text}"),
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisorError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisorError::Transport(format!(
                "advisor returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Malformed(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AdvisorError::Malformed("no choices in response".into()))?;
        Ok(content.trim().to_string())
    }
}

/// Picks the advisory backend from configuration.
pub fn from_config(cfg: &Config) -> Arc<dyn TextAdvisor> {
    let Some(key) = cfg.advisor_api_key.clone() else {
        return Arc::new(DisabledAdvisor);
    };
    match OpenAiAdvisor::new(
        cfg.advisor_api_url.clone(),
        key,
        cfg.advisor_model.clone(),
        cfg.advisor_timeout(),
    ) {
        Ok(advisor) => Arc::new(advisor),
        Err(err) => {
            warn!(error = %err, "advisor client failed to build, advisory disabled");
            Arc::new(DisabledAdvisor)
        }
    }
}
