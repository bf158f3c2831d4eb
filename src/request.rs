//! Request types accepted by the composers.
//!
//! These are the validated request bodies an HTTP layer (or the CLI) hands
//! to the library. Field presence and basic typing are the caller's problem;
//! the composers accept any string content and never fail on it. Historical
//! payload shapes used French field names (`client`, `artisan`, `nom`,
//! `promo`), kept as serde aliases so existing front-ends keep working.

use serde::{Deserialize, Serialize};

/// One row of the quote's itemised table.
///
/// `price` is a free-form string. It may use `.` or `,` as a decimal
/// separator, carry thousands grouping, or be plain prose — it is rendered
/// verbatim and only interpreted numerically at summation time via
/// [`crate::compose::textutil::safe_parse_money`]. Items have no identity
/// beyond their position in the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub price: String,
}

/// Input for the quote/invoice PDF composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Document title, e.g. "Devis" or "Facture". Free text; uppercased on render.
    #[serde(default = "default_document_label")]
    pub document_label: String,

    /// Client name, also used in the suggested download filename.
    #[serde(alias = "client")]
    pub client_name: String,

    /// Issuer (the artisan or business preparing the document).
    #[serde(alias = "artisan")]
    pub issuer_name: String,

    /// Free-form date string; rendered as given, never parsed.
    pub date: String,

    /// Ordered line items. May be empty: the table renders empty and the
    /// total shows 0.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

fn default_document_label() -> String {
    "Devis".to_string()
}

/// Input for the promotional-image composer.
///
/// Revision variants of this payload added `product_name` / `price`; they are
/// optional extensions of the one canonical entity, not separate types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoRequest {
    #[serde(alias = "nom")]
    pub issuer_name: String,

    /// The offer headline, e.g. "-50% sur les chaussures".
    #[serde(alias = "promo")]
    pub promo_text: String,

    /// Free-form validity date, e.g. "31/12".
    #[serde(alias = "date")]
    pub valid_until: String,

    /// Optional product the offer applies to.
    #[serde(default)]
    pub product_name: Option<String>,

    /// Optional displayed price for the product.
    #[serde(default)]
    pub price: Option<String>,
}

/// Input for AI marketing-message generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    #[serde(alias = "nom")]
    pub name: String,

    /// The issuer's trade, e.g. "menuisier".
    #[serde(alias = "metier")]
    pub trade: String,

    /// The service being promoted.
    pub service: String,

    /// The offer attached to the service, e.g. "-20% cette semaine".
    #[serde(alias = "offre")]
    pub offer: String,
}
