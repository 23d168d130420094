//! Narration: request shaping, providers, and the fallback chain.
//!
//! State mutation and narration are decoupled stages. By the time the
//! narrator runs, the transition has been decided (and, in the orchestrated
//! pipeline, persisted); nothing here can roll it back or re-run it.

mod openai;
mod request;
mod template;

pub use openai::{OpenAiConfig, OpenAiNarrator};
pub use request::NarrationRequest;
pub use template::TemplateNarrator;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::AgentResult;

/// Default ceiling on a provider call before the fallback takes over.
const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Generates prose from a structured narration request.
///
/// Providers may suspend (network calls); they must not mutate anything.
#[async_trait]
pub trait NarrationProvider: Send + Sync {
    /// Turn one request into narrative text.
    async fn generate(&self, request: &NarrationRequest) -> AgentResult<String>;
}

/// The narrator: an optional external provider with a bounded timeout,
/// backed by the deterministic templates.
///
/// `narrate` is infallible by construction: a provider failure or timeout
/// is logged and recovered locally, never surfaced to the player.
pub struct Narrator {
    provider: Option<Arc<dyn NarrationProvider>>,
    templates: TemplateNarrator,
    timeout: Duration,
}

impl Narrator {
    /// A narrator that only uses the deterministic templates.
    pub fn template_only() -> Self {
        Self {
            provider: None,
            templates: TemplateNarrator::new(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// A narrator that tries an external provider first.
    pub fn with_provider(provider: Arc<dyn NarrationProvider>) -> Self {
        Self {
            provider: Some(provider),
            templates: TemplateNarrator::new(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Override the provider timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Narrate one outcome. Always returns text.
    pub async fn narrate(&self, request: &NarrationRequest) -> String {
        if let Some(provider) = &self.provider {
            match tokio::time::timeout(self.timeout, provider.generate(request)).await {
                Ok(Ok(text)) if !text.trim().is_empty() => return text,
                Ok(Ok(_)) => {
                    warn!(turn = request.turn, "provider returned empty narration, using fallback");
                }
                Ok(Err(error)) => {
                    warn!(turn = request.turn, %error, "narration provider failed, using fallback");
                }
                Err(_) => {
                    warn!(turn = request.turn, timeout = ?self.timeout, "narration provider timed out, using fallback");
                }
            }
        }
        self.templates.render(request)
    }

    /// The introduction narrative for a fresh session.
    pub fn intro(
        &self,
        character_name: &str,
        class: ed_core::CharacterClass,
        world_name: &str,
    ) -> String {
        self.templates.intro(character_name, class, world_name)
    }
}
