//! # artisan-docgen
//!
//! Turn small-business form input (client name, line items, promotional
//! text) into two document artifacts — a quote/invoice PDF and a square
//! promotional PNG — plus AI-backed marketing text with deterministic
//! fallbacks.
//!
//! ## Pipeline Overview
//!
//! ```text
//! QuoteRequest                    PromoRequest
//!  │                               │
//!  ├─ layout  fixed A4 template    ├─ background  asset or gradient
//!  ├─ table   zebra rows, totals   ├─ overlay     legibility shade
//!  ├─ footer  trust + thanks       ├─ text layer  wrapped, centered
//!  └─ PDF bytes                    └─ flatten → PNG bytes
//!         │                               │
//!         └──────── RenderedArtifact ─────┘
//!              (uuid-keyed storage name)
//! ```
//!
//! Both composers are deterministic layout cores: they own their drawing
//! surface per call, share only pure helpers ([`safe_parse_money`],
//! [`wrap_text`]), and degrade gracefully — every optional asset (logo,
//! background, fonts) has a programmatic fallback, and a render only fails
//! when the final encoding does.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use artisan_docgen::{ComposeConfig, DocStudio, LineItem, QuoteRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let studio = DocStudio::new(ComposeConfig::default());
//! let req = QuoteRequest {
//!     document_label: "Devis".into(),
//!     client_name: "Awa".into(),
//!     issuer_name: "Koffi".into(),
//!     date: "2024-05-01".into(),
//!     items: vec![LineItem { description: "Réparation".into(), price: "15000".into() }],
//! };
//! let (artifact, path) = studio.quote_to_dir(&req)?;
//! println!("{} → {}", artifact.download_name(), path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docgen` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifact;
pub mod assets;
pub mod assistant;
pub mod compose;
pub mod config;
pub mod error;
pub mod prompts;
pub mod request;
pub mod studio;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifact::{MediaType, RenderedArtifact};
pub use assets::Assets;
pub use assistant::AssistantClient;
pub use compose::{compose_promo_image, compose_quote, safe_parse_money, wrap_text};
pub use config::{ComposeConfig, ComposeConfigBuilder};
pub use error::{AssistantError, ComposeError};
pub use request::{LineItem, MessageRequest, PromoRequest, QuoteRequest};
pub use studio::DocStudio;
