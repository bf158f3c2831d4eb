//! Integration tests for the assistant client against a mock provider.
//!
//! A local `httpmock` server stands in for the `generateContent` endpoint,
//! so these tests exercise the full HTTP/retry/fallback path without a real
//! API key or network access.
//!
//! Run with:
//!   cargo test --test assistant -- --nocapture

use artisan_docgen::prompts::FALLBACK_CHAT_REPLY;
use artisan_docgen::{AssistantClient, AssistantError, ComposeConfig, DocStudio, PromoRequest};
use httpmock::prelude::*;
use serde_json::json;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Config wired to the mock server, with fast retries so tests stay quick.
fn mock_config(server: &MockServer) -> ComposeConfig {
    ComposeConfig::builder()
        .assistant_api_key("test-key")
        .assistant_endpoint(server.base_url())
        .api_timeout_secs(5)
        .max_retries(2)
        .retry_backoff_ms(10)
        .build()
        .expect("valid config")
}

fn promo_request() -> PromoRequest {
    PromoRequest {
        issuer_name: "Chez Awa".into(),
        promo_text: "-50% sur les chaussures".into(),
        valid_until: "31/12".into(),
        product_name: None,
        price: None,
    }
}

/// The provider's happy-path reply body for `text`.
fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_returns_candidate_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-2.0-flash:generateContent")
                .query_param("key", "test-key");
            then.status(200).json_body(reply_body("  Offre en or !  "));
        })
        .await;

    let client = AssistantClient::from_config(&mock_config(&server)).unwrap();
    let text = client.generate("une accroche").await.expect("must succeed");

    mock.assert_async().await;
    assert_eq!(text, "Offre en or !", "reply must be trimmed");
}

#[tokio::test]
async fn tagline_flows_through_to_the_studio() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(reply_body("Tout doit partir !"));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ComposeConfig::builder()
        .assets_dir(dir.path().join("no-such-assets"))
        .output_dir(dir.path().join("generated"))
        .assistant_api_key("test-key")
        .assistant_endpoint(server.base_url())
        .retry_backoff_ms(10)
        .build()
        .unwrap();
    let studio = DocStudio::new(config);

    assert!(studio.has_assistant());
    let artifact = studio
        .promo_with_ai(&promo_request())
        .await
        .expect("promo must render");
    assert!(artifact.bytes().starts_with(&[0x89, b'P', b'N', b'G']));
}

// ── Error handling and retries ───────────────────────────────────────────────

#[tokio::test]
async fn server_errors_are_retried_then_surface() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500).body("boom");
        })
        .await;

    let client = AssistantClient::from_config(&mock_config(&server)).unwrap();
    let err = client.generate("une accroche").await.unwrap_err();

    // max_retries = 2 → 3 attempts in total.
    mock.assert_hits_async(3).await;
    assert!(matches!(err, AssistantError::Api { status: 500, .. }));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(400).body("bad request");
        })
        .await;

    let client = AssistantClient::from_config(&mock_config(&server)).unwrap();
    let err = client.generate("une accroche").await.unwrap_err();

    mock.assert_hits_async(1).await;
    assert!(matches!(err, AssistantError::Api { status: 400, .. }));
}

#[tokio::test]
async fn transient_failure_recovers_on_retry() {
    let server = MockServer::start_async().await;
    let fail = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(503).body("busy");
        })
        .await;

    let client = AssistantClient::from_config(&mock_config(&server)).unwrap();

    // First call exhausts retries against the failing mock; then swap in a
    // healthy response and verify the next call succeeds.
    assert!(client.generate("ping").await.is_err());
    fail.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(reply_body("ça repart"));
        })
        .await;

    assert_eq!(client.generate("ping").await.unwrap(), "ça repart");
}

#[tokio::test]
async fn empty_candidates_is_an_empty_reply() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let client = AssistantClient::from_config(&mock_config(&server)).unwrap();
    let err = client.generate("une accroche").await.unwrap_err();
    assert!(matches!(err, AssistantError::EmptyReply));
}

// ── Fallback behaviour ───────────────────────────────────────────────────────

#[tokio::test]
async fn unconfigured_studio_uses_static_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let config = ComposeConfig::builder()
        .assets_dir(dir.path().join("no-such-assets"))
        .output_dir(dir.path().join("generated"))
        .build()
        .unwrap();
    let studio = DocStudio::new(config);

    assert!(!studio.has_assistant());
    assert_eq!(studio.chat("Bonjour ?").await, FALLBACK_CHAT_REPLY);

    // promo_with_ai must fall back to the static tagline and still render.
    let artifact = studio
        .promo_with_ai(&promo_request())
        .await
        .expect("fallback promo must render");
    assert!(!artifact.bytes().is_empty());
}

#[tokio::test]
async fn provider_failure_degrades_to_fallback_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500).body("down");
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ComposeConfig::builder()
        .assets_dir(dir.path().join("no-such-assets"))
        .output_dir(dir.path().join("generated"))
        .assistant_api_key("test-key")
        .assistant_endpoint(server.base_url())
        .max_retries(0)
        .retry_backoff_ms(10)
        .build()
        .unwrap();
    let studio = DocStudio::new(config);

    let req = artisan_docgen::MessageRequest {
        name: "Koffi".into(),
        trade: "menuisier".into(),
        service: "Pose de portes".into(),
        offer: "-20% cette semaine".into(),
    };
    let text = studio.marketing_message(&req).await;
    assert!(
        text.contains("Koffi"),
        "fallback message must be built from the request, got {text:?}"
    );
}
