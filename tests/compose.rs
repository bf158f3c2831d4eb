//! Integration tests for the two composers.
//!
//! These tests run with no assets on disk: every optional input (logo,
//! background, brand fonts) must degrade per its fallback policy, and the
//! composers must still return well-formed PDF/PNG bytes. No network or
//! API key is needed.
//!
//! Run with:
//!   cargo test --test compose -- --nocapture

use artisan_docgen::{
    ComposeConfig, DocStudio, LineItem, MediaType, PromoRequest, QuoteRequest,
};
use image::GenericImageView;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Config pointing at a directory with no assets in it, writing into a
/// fresh temp dir.
fn bare_config(out: &std::path::Path) -> ComposeConfig {
    ComposeConfig::builder()
        .assets_dir(out.join("no-such-assets"))
        .output_dir(out.join("generated"))
        .build()
        .expect("valid config")
}

fn quote_request() -> QuoteRequest {
    QuoteRequest {
        document_label: "Devis".into(),
        client_name: "Awa".into(),
        issuer_name: "Koffi Menuiserie".into(),
        date: "2024-05-01".into(),
        items: vec![
            LineItem {
                description: "Réparation porte d'entrée".into(),
                price: "15000".into(),
            },
            LineItem {
                description: "Pose de serrure".into(),
                price: "5,000".into(),
            },
        ],
    }
}

fn promo_request() -> PromoRequest {
    PromoRequest {
        issuer_name: "Chez Awa".into(),
        promo_text: "-50% sur toutes les chaussures pour enfants".into(),
        valid_until: "31/12".into(),
        product_name: Some("Chaussures enfants".into()),
        price: Some("5000".into()),
    }
}

/// Basic well-formedness checks for a finished PDF.
fn assert_pdf_quality(bytes: &[u8], context: &str) {
    assert!(
        bytes.starts_with(b"%PDF"),
        "[{context}] PDF must start with %PDF, got {:?}",
        &bytes[..bytes.len().min(8)]
    );
    assert!(
        bytes.len() > 1000,
        "[{context}] PDF suspiciously small: {} bytes",
        bytes.len()
    );
    println!("[{context}] ✓  {} bytes, PDF checks passed", bytes.len());
}

/// Decode a finished PNG and check its pixel dimensions.
fn assert_png_quality(bytes: &[u8], expected_edge: u32, context: &str) {
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
    assert!(
        bytes.starts_with(&PNG_MAGIC),
        "[{context}] PNG signature missing"
    );

    let img = image::load_from_memory(bytes).expect("PNG must decode");
    assert_eq!(
        img.dimensions(),
        (expected_edge, expected_edge),
        "[{context}] canvas must be square at the configured size"
    );
    println!(
        "[{context}] ✓  {} bytes, {}×{} px",
        bytes.len(),
        expected_edge,
        expected_edge
    );
}

// ── Quote composition ────────────────────────────────────────────────────────

#[test]
fn quote_renders_without_any_assets() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let artifact = studio.quote(&quote_request()).expect("quote must render");

    assert_eq!(artifact.media_type(), MediaType::Pdf);
    assert_eq!(artifact.download_name(), "Devis_Awa.pdf");
    assert_pdf_quality(artifact.bytes(), "quote-no-assets");
}

#[test]
fn quote_with_empty_items_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let req = QuoteRequest {
        items: vec![],
        ..quote_request()
    };
    let artifact = studio.quote(&req).expect("empty quote must render");
    assert_pdf_quality(artifact.bytes(), "quote-empty-items");
}

#[test]
fn quote_with_unparsable_prices_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let req = QuoteRequest {
        items: vec![
            LineItem {
                description: "Main d'œuvre".into(),
                price: "à discuter".into(),
            },
            LineItem {
                description: "Fournitures".into(),
                price: "12000".into(),
            },
        ],
        ..quote_request()
    };
    let artifact = studio.quote(&req).expect("quote must render");
    assert_pdf_quality(artifact.bytes(), "quote-bad-prices");
}

#[test]
fn quote_custom_label_drives_names() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let req = QuoteRequest {
        document_label: "Facture".into(),
        ..quote_request()
    };
    let artifact = studio.quote(&req).expect("invoice must render");

    assert_eq!(artifact.download_name(), "Facture_Awa.pdf");
    assert!(
        artifact.storage_name().starts_with("facture_"),
        "storage prefix should be the lowercased label, got {}",
        artifact.storage_name()
    );
}

#[test]
fn quote_to_dir_persists_under_storage_name() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let (artifact, path) = studio
        .quote_to_dir(&quote_request())
        .expect("quote must render and persist");

    assert!(path.exists(), "artifact file must exist on disk");
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        artifact.storage_name()
    );
    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, artifact.bytes(), "bytes on disk must match");
}

// ── Promo composition ────────────────────────────────────────────────────────

#[test]
fn promo_renders_gradient_fallback_at_default_size() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let artifact = studio
        .promo(&promo_request(), "L'Offre à ne pas Manquer !")
        .expect("promo must render");

    assert_eq!(artifact.media_type(), MediaType::Png);
    assert_eq!(artifact.download_name(), "Promo_Chez_Awa.png");
    assert_png_quality(artifact.bytes(), 1080, "promo-default");
}

#[test]
fn promo_canvas_size_is_respected() {
    let dir = tempfile::tempdir().unwrap();
    let config = ComposeConfig::builder()
        .assets_dir(dir.path().join("no-such-assets"))
        .output_dir(dir.path().join("generated"))
        .canvas_size(512)
        .build()
        .expect("valid config");
    let studio = DocStudio::new(config);

    let artifact = studio
        .promo(&promo_request(), "Offre flash !")
        .expect("promo must render");
    assert_png_quality(artifact.bytes(), 512, "promo-512");
}

#[test]
fn promo_renders_with_minimal_request() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let req = PromoRequest {
        issuer_name: "".into(),
        promo_text: "".into(),
        valid_until: "".into(),
        product_name: None,
        price: None,
    };
    let artifact = studio.promo(&req, "").expect("empty promo must render");
    assert_png_quality(artifact.bytes(), 1080, "promo-minimal");
}

#[test]
fn promo_gradient_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let studio = DocStudio::new(bare_config(dir.path()));

    let a = studio.promo(&promo_request(), "Même accroche").unwrap();
    let b = studio.promo(&promo_request(), "Même accroche").unwrap();
    assert_eq!(
        a.bytes(),
        b.bytes(),
        "same request + tagline must produce identical pixels"
    );
    assert_ne!(
        a.storage_name(),
        b.storage_name(),
        "but each render gets its own storage name"
    );
}

#[test]
fn promo_uses_real_background_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("brand");
    std::fs::create_dir_all(&assets).unwrap();

    // A 4×4 solid-red PNG; the composer must resize it to the full canvas.
    let bg = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 30, 30, 255]));
    bg.save(assets.join("background.png")).unwrap();

    let config = ComposeConfig::builder()
        .assets_dir(&assets)
        .output_dir(dir.path().join("generated"))
        .canvas_size(256)
        .overlay_opacity(0.0)
        .build()
        .expect("valid config");
    let studio = DocStudio::new(config);

    let artifact = studio.promo(&promo_request(), "Promo !").unwrap();
    let img = image::load_from_memory(artifact.bytes()).unwrap().to_rgb8();

    // A corner pixel sits outside every text block; with a zero-opacity
    // overlay it must still carry the background's red.
    let corner = img.get_pixel(2, 2);
    assert!(
        corner[0] > 150 && corner[1] < 80,
        "corner pixel should be background red, got {corner:?}"
    );
}

// ── Concurrency ──────────────────────────────────────────────────────────────

#[test]
fn concurrent_renders_never_collide_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let studio = Arc::new(DocStudio::new(bare_config(dir.path())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let studio = Arc::clone(&studio);
            std::thread::spawn(move || {
                studio
                    .quote_to_dir(&quote_request())
                    .expect("concurrent quote must render")
                    .1
            })
        })
        .collect();

    let mut paths: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 8, "every render must land in its own file");
    for p in &paths {
        assert!(p.exists());
    }
}
