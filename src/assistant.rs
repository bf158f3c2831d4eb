//! Generative-text provider client and its degrade-don't-fail wrappers.
//!
//! The composers never talk to the provider: they receive already-generated
//! text as a plain string. This module is the glue that produces that
//! string — a thin `generateContent` REST client plus `*_or_fallback`
//! helpers that absorb every failure into a deterministic static string
//! from [`crate::prompts`].
//!
//! ## Retry strategy
//!
//! Transient provider errors (HTTP 429/5xx, timeouts) are retried with
//! exponential backoff (`retry_backoff_ms * 2^attempt`); permanent errors
//! (4xx other than 429) surface immediately. Every attempt is bounded by
//! the configured per-call timeout, so the caller always gets an answer —
//! generated or fallback — within a predictable window.

use crate::config::ComposeConfig;
use crate::error::AssistantError;
use crate::prompts;
use crate::request::{MessageRequest, PromoRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Default provider base URL (Gemini-compatible `generateContent` API).
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the generative-text provider.
///
/// Construct once via [`AssistantClient::from_config`] and reuse; the inner
/// HTTP client pools connections.
pub struct AssistantClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl AssistantClient {
    /// Build a client from the shared config.
    ///
    /// Returns [`AssistantError::NotConfigured`] when no API key is set —
    /// callers that want silent degradation hold an `Option<AssistantClient>`
    /// and route through the `*_or_fallback` helpers.
    pub fn from_config(config: &ComposeConfig) -> Result<Self, AssistantError> {
        let api_key = config
            .assistant_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AssistantError::NotConfigured)?;

        let http = Client::builder()
            .build()
            .map_err(|e| AssistantError::Http { source: e })?;

        Ok(Self {
            http,
            api_key,
            model: config.assistant_model.clone(),
            base_url: config
                .assistant_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout_secs: config.api_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Send one instruction and return the provider's short text reply.
    ///
    /// Retries transient failures; each attempt is bounded by the per-call
    /// timeout so the whole call completes within
    /// `(max_retries + 1) * timeout + backoff` at worst.
    pub async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let mut last_err = AssistantError::EmptyReply;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = self.retry_backoff_ms * 2u64.pow(attempt - 1);
                warn!("Assistant retry {attempt}/{} after {backoff}ms", self.max_retries);
                sleep(Duration::from_millis(backoff)).await;
            }

            match timeout(Duration::from_secs(self.timeout_secs), self.call(prompt)).await {
                Err(_) => {
                    last_err = AssistantError::Timeout {
                        secs: self.timeout_secs,
                    };
                }
                Ok(Ok(text)) => {
                    debug!(chars = text.len(), "assistant reply received");
                    return Ok(text);
                }
                // 4xx (other than rate limiting) will not get better by retrying.
                Ok(Err(e @ AssistantError::Api { status, .. }))
                    if status != 429 && status < 500 =>
                {
                    return Err(e);
                }
                Ok(Err(e)) => {
                    warn!("Assistant attempt {} failed: {e}", attempt + 1);
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    async fn call(&self, prompt: &str) -> Result<String, AssistantError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(self.api_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Http { source: e })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Http { source: e })?;

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
            .ok_or(AssistantError::EmptyReply)
    }

    /// Generate a short WhatsApp-style marketing message.
    pub async fn marketing_message(&self, req: &MessageRequest) -> Result<String, AssistantError> {
        self.generate(&prompts::marketing_prompt(req)).await
    }

    /// Generate a one-line promo tagline for the image composer.
    pub async fn promo_tagline(&self, req: &PromoRequest) -> Result<String, AssistantError> {
        self.generate(&prompts::tagline_prompt(req)).await
    }

    /// One scoped conversational turn.
    pub async fn chat(&self, question: &str) -> Result<String, AssistantError> {
        self.generate(&prompts::chat_prompt(question)).await
    }
}

impl std::fmt::Debug for AssistantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ── Fallback wrappers ────────────────────────────────────────────────────

/// Tagline for the promo composer: AI-generated when possible, otherwise
/// the static fallback. Never fails.
pub async fn tagline_or_fallback(client: Option<&AssistantClient>, req: &PromoRequest) -> String {
    match client {
        None => prompts::FALLBACK_TAGLINE.to_string(),
        Some(c) => c.promo_tagline(req).await.unwrap_or_else(|e| {
            warn!("Tagline generation failed, using fallback: {e}");
            prompts::FALLBACK_TAGLINE.to_string()
        }),
    }
}

/// Marketing message with deterministic fallback. Never fails.
pub async fn message_or_fallback(
    client: Option<&AssistantClient>,
    req: &MessageRequest,
) -> String {
    match client {
        None => prompts::fallback_message(req),
        Some(c) => c.marketing_message(req).await.unwrap_or_else(|e| {
            warn!("Message generation failed, using fallback: {e}");
            prompts::fallback_message(req)
        }),
    }
}

/// Chat reply with static fallback. Never fails.
pub async fn chat_or_fallback(client: Option<&AssistantClient>, question: &str) -> String {
    match client {
        None => prompts::FALLBACK_CHAT_REPLY.to_string(),
        Some(c) => c.chat(question).await.unwrap_or_else(|e| {
            warn!("Chat turn failed, using fallback: {e}");
            prompts::FALLBACK_CHAT_REPLY.to_string()
        }),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < max)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &s[..cut])
    }
}

// ── Wire types (generateContent request/response) ────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ReplyContent>,
}

#[derive(Debug, Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}
