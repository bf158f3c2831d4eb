//! Composition stages: the deterministic layout cores of the crate.
//!
//! Each submodule implements exactly one concern, so the two composers stay
//! independently testable and share nothing but the pure helpers:
//!
//! ```text
//! QuoteRequest ──▶ quote  ──▶ RenderedArtifact (application/pdf)
//! PromoRequest ──▶ promo  ──▶ RenderedArtifact (image/png)
//!                    │
//!                textutil  (safe_parse_money, wrap_text — pure, no I/O)
//! ```
//!
//! Both composers take the resolved [`crate::assets::Assets`] and the
//! [`crate::config::ComposeConfig`] by reference and own their drawing
//! surface exclusively for the duration of the call — no cross-request
//! shared mutable state, no locking.

pub mod promo;
pub mod quote;
pub mod textutil;

pub use promo::compose_promo_image;
pub use quote::compose_quote;
pub use textutil::{safe_parse_money, wrap_text};
