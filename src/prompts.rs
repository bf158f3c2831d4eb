//! Prompt strings and deterministic fallbacks for the assistant.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the assistant's tone or scope
//!    means editing exactly one place.
//! 2. **Testability** — unit tests inspect the prompts directly without
//!    calling a real provider.
//!
//! Each generated text also has a static fallback below, used whenever the
//! provider is unconfigured, times out, or errors. Fallbacks are plain
//! functions of the request, so the degraded path stays deterministic.

use crate::request::{MessageRequest, PromoRequest};

/// System framing for the conversational assistant: a scoped helper for
/// small-business owners, which politely declines out-of-domain questions.
pub const CHAT_SYSTEM_PROMPT: &str = "\
Tu es un assistant IA expert, amical et encourageant, conçu pour les artisans \
et petits entrepreneurs. Ton rôle est de fournir des conseils pratiques et des \
idées créatives : slogans publicitaires, messages professionnels pour des \
clients (remerciements, relances, annonces), idées de promotions ou de \
nouveaux services, stratégies simples de visibilité, aide à structurer des \
devis ou des factures.

Règles importantes :
1. Ton ton doit être simple, positif et facile à comprendre.
2. Utilise des emojis de manière pertinente. ✨👍
3. Si la question sort de ton domaine, réponds poliment que tu es spécialisé \
dans l'aide aux entrepreneurs et propose de revenir au sujet.
4. Garde tes réponses concises et directes.";

/// Static tagline used when no AI-generated tagline is available.
pub const FALLBACK_TAGLINE: &str = "L'Offre à ne pas Manquer !";

/// Static chat reply used when the provider is unavailable.
pub const FALLBACK_CHAT_REPLY: &str =
    "Oups, le service IA est indisponible pour le moment. Pourriez-vous réessayer ?";

/// Instruction for a short WhatsApp-style marketing message.
pub fn marketing_prompt(req: &MessageRequest) -> String {
    format!(
        "Rédige un message WhatsApp court, amical et percutant en français \
         simple. Utilise 1-2 emojis. Artisan : {} ({}), Service : {}, \
         Offre : {}. Rédige uniquement le message.",
        req.name, req.trade, req.service, req.offer
    )
}

/// Instruction for a punchy one-line promo tagline.
pub fn tagline_prompt(req: &PromoRequest) -> String {
    format!(
        "Rédige une accroche publicitaire très courte (moins de 8 mots), en \
         français, pour une affiche promotionnelle. Commerce : {}. \
         Promotion : {}. Valable jusqu'au {}. Rédige uniquement l'accroche, \
         sans guillemets.",
        req.issuer_name, req.promo_text, req.valid_until
    )
}

/// Full prompt for one conversational turn.
pub fn chat_prompt(question: &str) -> String {
    format!("{CHAT_SYSTEM_PROMPT}\n\nQuestion de l'artisan : \"{question}\".\nRéponse :")
}

/// Deterministic marketing message used when the provider is unavailable.
pub fn fallback_message(req: &MessageRequest) -> String {
    format!(
        "Super promo chez {} ! Profitez de « {} » avec {}. Contactez-nous !",
        req.name, req.service, req.offer
    )
}
