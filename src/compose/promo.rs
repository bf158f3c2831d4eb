//! Promotional image composition on a fixed square canvas.
//!
//! Compositing order is deterministic: background (asset or gradient), then
//! a semi-transparent dark overlay for text legibility, then a separate
//! transparent text layer alpha-composited on top, then a flatten to opaque
//! RGB before PNG encoding. Text is never drawn straight onto the
//! background, so layer order cannot vary between calls.
//!
//! All vertical anchors are expressed for a 1080 px canvas and scaled
//! linearly to the configured size.

use crate::artifact::{MediaType, RenderedArtifact};
use crate::assets::{Assets, FontAsset};
use crate::compose::textutil::wrap_text;
use crate::config::ComposeConfig;
use crate::error::ComposeError;
use crate::request::PromoRequest;
use ab_glyph::PxScale;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::io::Cursor;
use tracing::{debug, warn};

/// Vertical anchors and sizes for a 1080 px canvas; everything scales with
/// `canvas_size / 1080`.
mod layout {
    pub const BANNER_CENTER_Y: f32 = 150.0;
    pub const BANNER_TEXT_PX: f32 = 44.0;
    pub const BANNER_PAD_X: f32 = 36.0;
    pub const BANNER_PAD_Y: f32 = 18.0;

    pub const HEADLINE_CENTER_Y: f32 = 430.0;
    pub const HEADLINE_PX: f32 = 82.0;
    pub const HEADLINE_WRAP_CHARS: usize = 18;
    pub const LINE_SPACING: f32 = 1.18;
    pub const OUTLINE_PX: f32 = 3.0;

    pub const PRODUCT_Y: f32 = 650.0;
    pub const PRODUCT_PX: f32 = 46.0;

    pub const TAGLINE_Y: f32 = 760.0;
    pub const TAGLINE_PX: f32 = 58.0;

    pub const FOOTER_Y: f32 = 980.0;
    pub const FOOTER_PX: f32 = 36.0;

    pub const SHADE: [u8; 3] = [10, 12, 24];
    pub const TEXT: [u8; 4] = [255, 255, 255, 255];
    pub const TEXT_SOFT: [u8; 4] = [235, 235, 240, 255];
    pub const OUTLINE: [u8; 4] = [12, 12, 18, 255];
}

/// Compose a square promotional PNG.
///
/// `tagline` is supplied by the caller (AI-generated or a static fallback);
/// this function performs layout only. Missing background or fonts degrade
/// the visuals, never the call: a valid flattened PNG is always produced
/// unless encoding itself fails.
pub fn compose_promo_image(
    req: &PromoRequest,
    tagline: &str,
    assets: &Assets,
    config: &ComposeConfig,
) -> Result<RenderedArtifact, ComposeError> {
    let size = config.canvas_size;

    // 1. Background: supplied asset resized to the canvas, else gradient.
    let mut canvas: RgbaImage = match assets.background() {
        Some(img) => img
            .resize_exact(size, size, FilterType::CatmullRom)
            .to_rgba8(),
        None => vertical_gradient(size, config.gradient_top, config.gradient_bottom),
    };

    // 2. Legibility overlay across the full canvas.
    let alpha = (config.overlay_opacity * 255.0).round().clamp(0.0, 255.0) as u8;
    let [sr, sg, sb] = layout::SHADE;
    let shade = RgbaImage::from_pixel(size, size, Rgba([sr, sg, sb, alpha]));
    imageops::overlay(&mut canvas, &shade, 0, 0);

    // 3. Separate transparent text layer.
    let mut text_layer = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    if assets.has_raster_font() {
        draw_text_blocks(&mut text_layer, req, tagline, assets, config);
    } else {
        warn!("No font available; promo image rendered without text");
    }

    // 4. Composite text over background+overlay, flatten to opaque RGB.
    imageops::overlay(&mut canvas, &text_layer, 0, 0);
    let flat = DynamicImage::ImageRgba8(canvas).to_rgb8();

    // 5. Encode.
    let mut bytes = Vec::new();
    flat.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ComposeError::ImageEncode { source: e })?;
    debug!(size, bytes = bytes.len(), "promo image encoded");

    let stem = format!("Promo_{}", req.issuer_name);
    Ok(RenderedArtifact::new(MediaType::Png, "promo", &stem, bytes))
}

/// Deterministic fallback background: linear vertical interpolation between
/// the two configured colors.
pub(crate) fn vertical_gradient(size: u32, top: [u8; 3], bottom: [u8; 3]) -> RgbaImage {
    let denom = size.saturating_sub(1).max(1) as f32;
    RgbaImage::from_fn(size, size, |_, y| {
        let t = y as f32 / denom;
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba([
            channel(top[0], bottom[0]),
            channel(top[1], bottom[1]),
            channel(top[2], bottom[2]),
            255,
        ])
    })
}

/// Draw banner, headline, product/price or tagline, and footer onto the
/// text layer, top to bottom at fixed scaled anchors.
fn draw_text_blocks(
    layer: &mut RgbaImage,
    req: &PromoRequest,
    tagline: &str,
    assets: &Assets,
    config: &ComposeConfig,
) {
    use layout::*;

    // has_raster_font() guarantees at least one face below.
    let (Some(bold), Some(regular)) = (assets.bold_or_regular(), assets.regular_or_bold()) else {
        return;
    };

    let f = config.canvas_size as f32 / 1080.0;
    let cx = (config.canvas_size / 2) as i32;

    // Banner strip with centered label.
    let banner_text = config.banner_label.to_uppercase();
    if !banner_text.is_empty() {
        let scale = PxScale::from(BANNER_TEXT_PX * f);
        let (tw, th) = text_size(scale, bold.glyphs(), &banner_text);
        let (tw, th) = (tw as i32, th as i32);
        let pad_x = (BANNER_PAD_X * f) as i32;
        let pad_y = (BANNER_PAD_Y * f) as i32;
        let band_w = (tw + 2 * pad_x).max(1) as u32;
        let band_h = (th + 2 * pad_y).max(1) as u32;
        let band_y = (BANNER_CENTER_Y * f) as i32 - band_h as i32 / 2;
        let [br, bg, bb] = config.banner_color;
        draw_filled_rect_mut(
            layer,
            Rect::at(cx - band_w as i32 / 2, band_y).of_size(band_w, band_h),
            Rgba([br, bg, bb, 255]),
        );
        draw_centered(layer, bold, BANNER_TEXT_PX * f, Rgba(TEXT), cx, (BANNER_CENTER_Y * f) as i32, &banner_text);
    }

    // Headline: wrapped, centered as a block around its anchor, outlined.
    let lines = wrap_text(&req.promo_text, HEADLINE_WRAP_CHARS);
    let line_px = HEADLINE_PX * f;
    let line_step = line_px * LINE_SPACING;
    let block_h = line_step * lines.len().max(1) as f32;
    let mut line_y = HEADLINE_CENTER_Y * f - block_h / 2.0 + line_step / 2.0;
    for line in &lines {
        draw_outlined_centered(layer, bold, line_px, cx, line_y as i32, line, (OUTLINE_PX * f) as i32);
        line_y += line_step;
    }

    // Optional product line (revision extension of the request shape).
    if let Some(product) = req.product_name.as_deref().filter(|p| !p.trim().is_empty()) {
        draw_centered(layer, regular, PRODUCT_PX * f, Rgba(TEXT_SOFT), cx, (PRODUCT_Y * f) as i32, product);
    }

    // Price when supplied, otherwise the generated/fallback tagline.
    let accent_line = match req.price.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(price) => format!("{} {}", price, config.currency_label),
        None => tagline.to_string(),
    };
    if !accent_line.trim().is_empty() {
        draw_centered(layer, bold, TAGLINE_PX * f, Rgba(TEXT), cx, (TAGLINE_Y * f) as i32, &accent_line);
    }

    // Footer: issuer + validity date.
    let footer = format!("Chez {} · Jusqu'au {}", req.issuer_name, req.valid_until);
    draw_centered(layer, regular, FOOTER_PX * f, Rgba(TEXT_SOFT), cx, (FOOTER_Y * f) as i32, &footer);
}

/// Draw `text` with center/middle anchoring around `(cx, cy)`.
fn draw_centered(
    layer: &mut RgbaImage,
    font: &FontAsset,
    px: f32,
    color: Rgba<u8>,
    cx: i32,
    cy: i32,
    text: &str,
) {
    let scale = PxScale::from(px);
    let (w, h) = text_size(scale, font.glyphs(), text);
    let (w, h) = (w as i32, h as i32);
    draw_text_mut(layer, color, cx - w / 2, cy - h / 2, scale, font.glyphs(), text);
}

/// Centered text with a dark outline for contrast against arbitrary
/// backgrounds: the outline color is stamped at the four diagonal offsets
/// before the fill pass.
fn draw_outlined_centered(
    layer: &mut RgbaImage,
    font: &FontAsset,
    px: f32,
    cx: i32,
    cy: i32,
    text: &str,
    offset: i32,
) {
    let o = offset.max(1);
    for (dx, dy) in [(-o, -o), (o, -o), (-o, o), (o, o)] {
        draw_centered(layer, font, px, Rgba(layout::OUTLINE), cx + dx, cy + dy, text);
    }
    draw_centered(layer, font, px, Rgba(layout::TEXT), cx, cy, text);
}
