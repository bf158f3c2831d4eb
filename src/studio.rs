//! End-to-end entry points: config + assets + assistant, resolved once.
//!
//! [`DocStudio`] is the seam an HTTP layer or the CLI calls. It owns the
//! immutable configuration, the one-time asset resolution, and the optional
//! assistant client, and exposes each operation as a method. All state is
//! read-only after construction, so a single `DocStudio` can be shared
//! across concurrent requests freely.

use crate::artifact::RenderedArtifact;
use crate::assets::Assets;
use crate::assistant::{
    chat_or_fallback, message_or_fallback, tagline_or_fallback, AssistantClient,
};
use crate::compose::{compose_promo_image, compose_quote};
use crate::config::ComposeConfig;
use crate::error::{AssistantError, ComposeError};
use crate::request::{MessageRequest, PromoRequest, QuoteRequest};
use std::path::PathBuf;
use tracing::{info, warn};

/// The composed service: everything resolved, ready to handle requests.
#[derive(Debug)]
pub struct DocStudio {
    config: ComposeConfig,
    assets: Assets,
    assistant: Option<AssistantClient>,
}

impl DocStudio {
    /// Resolve assets and the assistant from `config`. Never fails: missing
    /// assets degrade per their fallback policy and a missing API key just
    /// disables AI generation (fallback strings are used instead).
    pub fn new(config: ComposeConfig) -> Self {
        let assets = Assets::resolve(&config);
        let assistant = match AssistantClient::from_config(&config) {
            Ok(client) => {
                info!(model = %config.assistant_model, "assistant configured");
                Some(client)
            }
            Err(AssistantError::NotConfigured) => {
                info!("assistant not configured; static fallbacks will be used");
                None
            }
            Err(e) => {
                warn!("assistant client unavailable, using fallbacks: {e}");
                None
            }
        };
        Self {
            config,
            assets,
            assistant,
        }
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// True when AI generation is active (an API key was configured).
    pub fn has_assistant(&self) -> bool {
        self.assistant.is_some()
    }

    /// Compose a quote/invoice PDF in memory.
    pub fn quote(&self, req: &QuoteRequest) -> Result<RenderedArtifact, ComposeError> {
        compose_quote(req, &self.assets, &self.config)
    }

    /// Compose a promo image with an explicit tagline (caller-supplied or
    /// already generated).
    pub fn promo(&self, req: &PromoRequest, tagline: &str) -> Result<RenderedArtifact, ComposeError> {
        compose_promo_image(req, tagline, &self.assets, &self.config)
    }

    /// Compose a promo image, generating the tagline through the assistant
    /// when configured, with the static fallback otherwise.
    pub async fn promo_with_ai(&self, req: &PromoRequest) -> Result<RenderedArtifact, ComposeError> {
        let tagline = tagline_or_fallback(self.assistant.as_ref(), req).await;
        self.promo(req, &tagline)
    }

    /// Compose a quote and persist it into the configured output directory.
    pub fn quote_to_dir(&self, req: &QuoteRequest) -> Result<(RenderedArtifact, PathBuf), ComposeError> {
        let artifact = self.quote(req)?;
        let path = artifact.write_to_dir(&self.config.output_dir)?;
        Ok((artifact, path))
    }

    /// Compose a promo image and persist it into the output directory.
    pub fn promo_to_dir(
        &self,
        req: &PromoRequest,
        tagline: &str,
    ) -> Result<(RenderedArtifact, PathBuf), ComposeError> {
        let artifact = self.promo(req, tagline)?;
        let path = artifact.write_to_dir(&self.config.output_dir)?;
        Ok((artifact, path))
    }

    /// Marketing message: AI-generated when configured, deterministic
    /// fallback otherwise. Never fails.
    pub async fn marketing_message(&self, req: &MessageRequest) -> String {
        message_or_fallback(self.assistant.as_ref(), req).await
    }

    /// One conversational turn with the scoped assistant. Never fails.
    pub async fn chat(&self, question: &str) -> String {
        chat_or_fallback(self.assistant.as_ref(), question).await
    }
}
