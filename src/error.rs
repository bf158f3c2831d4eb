//! Error types for the artisan-docgen library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ComposeError`] — **Fatal**: a composer could not finalise its artifact
//!   (PDF serialisation failed, PNG encoding failed, the output directory is
//!   not writable). Returned as `Err(ComposeError)` from the `compose_*`
//!   functions and the [`crate::studio::DocStudio`] entry points.
//!
//! * [`AssistantError`] — the generative-text provider was unavailable or
//!   misbehaved. Never reaches a composer: the fallback layer in
//!   [`crate::assistant`] absorbs it and substitutes a static string.
//!
//! Everything else — missing logo, missing background, missing font files,
//! unparsable price strings — is deliberately **not** an error. Those paths
//! return fallback values from small pure functions so the composers read as
//! straight-line logic.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the composers.
///
/// Missing optional assets and malformed line-item prices degrade output
/// fidelity only and are absorbed before this type is ever constructed.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Configuration rejected by [`crate::config::ComposeConfigBuilder::build`].
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The PDF document could not be serialised to bytes.
    #[error("Failed to serialise quote PDF: {detail}")]
    PdfRender { detail: String },

    /// The promotional image could not be PNG-encoded.
    #[error("Failed to encode promotional image: {source}")]
    ImageEncode {
        #[source]
        source: image::ImageError,
    },

    /// Writing the finished artifact to the output directory failed.
    #[error("Failed to write artifact to '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Internal invariant violation (task panic, runtime construction).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of the generative-text provider.
///
/// The provider contract is: given a natural-language instruction, return a
/// short string within a bounded time, or signal unavailability. Callers that
/// want degrade-don't-fail behaviour use the `*_or_fallback` helpers in
/// [`crate::assistant`] instead of handling this directly.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key configured; the client cannot make calls at all.
    #[error("Assistant is not configured: set GEMINI_API_KEY or ComposeConfig::assistant_api_key")]
    NotConfigured,

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("Assistant HTTP request failed: {source}")]
    Http {
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Assistant API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered 200 but carried no usable text candidate.
    #[error("Assistant returned an empty reply")]
    EmptyReply,

    /// The bounded-time contract was exceeded.
    #[error("Assistant call timed out after {secs}s")]
    Timeout { secs: u64 },
}
