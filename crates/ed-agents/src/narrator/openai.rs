//! OpenAI-compatible chat-completion narration provider.
//!
//! A thin wrapper: it ships the structured narration request to any endpoint
//! speaking the chat-completions dialect and returns the first choice. All
//! resilience (timeout, fallback) lives in [`super::Narrator`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::NarrationProvider;
use super::request::NarrationRequest;
use crate::error::{AgentError, AgentResult};

const SYSTEM_PROMPT: &str = "You are the narrator of a classic text adventure \
    set in a treasure cave. You receive a structured JSON event describing what \
    just happened to the player. Narrate it in second person, 2-3 vivid \
    sentences, matching the tone of classic text adventures. When \
    collapse_active is true, weave in urgency: the cave is coming down. Never \
    invent items, rooms, or mechanics that are not in the event. Reply with \
    the narration only.";

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL of the API, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Bearer token.
    pub api_key: String,
}

impl OpenAiConfig {
    /// Config against the public OpenAI API with the given key.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: api_key.into(),
        }
    }

    /// Read the configuration from `OPENAI_API_KEY` (and optionally
    /// `OPENAI_BASE_URL` / `OPENAI_MODEL`).
    pub fn from_env() -> AgentResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;
        let mut config = Self::openai(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Narration provider backed by an OpenAI-compatible chat endpoint.
pub struct OpenAiNarrator {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiNarrator {
    /// Create a provider from a config.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn build_body(&self, request: &NarrationRequest) -> AgentResult<ChatRequest> {
        let event_json = serde_json::to_string_pretty(request)
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;
        Ok(ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: event_json,
                },
            ],
            temperature: 0.8,
        })
    }
}

#[async_trait]
impl NarrationProvider for OpenAiNarrator {
    async fn generate(&self, request: &NarrationRequest) -> AgentResult<String> {
        let body = self.build_body(request)?;
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        debug!(%url, model = %self.config.model, turn = request.turn, "requesting narration");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| AgentError::MalformedResponse("no choices in response".to_string()))
    }
}
