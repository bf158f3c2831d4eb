//! One-time resolution of optional assets: fonts, logo, background.
//!
//! Every asset here is optional and has a programmatic fallback, so
//! resolution never fails — it only logs what it could not find. The
//! resolved [`Assets`] value is built once at process start (next to the
//! [`crate::config::ComposeConfig`]) and passed by reference into each
//! composer call; there is no per-request disk probing and no global state.
//!
//! ## Font fallback chain
//!
//! 1. The preferred TTF from the config (`Poppins` by default).
//! 2. A short list of fonts that ship with mainstream Linux/macOS/Windows
//!    installs (DejaVu, Liberation, Noto, FreeSans, Arial).
//! 3. Nothing — the quote composer then uses the PDF built-in Helvetica
//!    family (always available to PDF viewers), and the promo composer
//!    skips text drawing rather than fail.

use crate::config::ComposeConfig;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A loaded TTF: raw bytes for PDF embedding plus parsed glyph metrics for
/// raster drawing and width measurement.
pub struct FontAsset {
    data: Vec<u8>,
    glyphs: FontVec,
    source: PathBuf,
}

impl FontAsset {
    fn load(path: &Path) -> Option<Self> {
        let data = std::fs::read(path).ok()?;
        let glyphs = match FontVec::try_from_vec(data.clone()) {
            Ok(f) => f,
            Err(e) => {
                warn!("Font file '{}' is not a usable TTF: {e}", path.display());
                return None;
            }
        };
        Some(Self {
            data,
            glyphs,
            source: path.to_path_buf(),
        })
    }

    /// Raw font file bytes, for embedding into a PDF.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parsed font for `imageproc` text drawing.
    pub fn glyphs(&self) -> &FontVec {
        &self.glyphs
    }

    /// Where the font was found (preferred path or system fallback).
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Advance width of `text` at pixel size `px`.
    pub fn line_width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.glyphs.as_scaled(PxScale::from(px));
        text.chars()
            .map(|c| scaled.h_advance(self.glyphs.glyph_id(c)))
            .sum()
    }
}

impl std::fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAsset")
            .field("source", &self.source)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Resolved optional assets, shared read-only across all composer calls.
#[derive(Debug, Default)]
pub struct Assets {
    /// Regular-weight face, if any could be found.
    pub regular: Option<FontAsset>,
    /// Bold-weight face, if any could be found.
    pub bold: Option<FontAsset>,
    logo_png: Option<Vec<u8>>,
    background: Option<DynamicImage>,
}

/// Well-known regular-weight font locations, probed in order.
const REGULAR_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Well-known bold-weight font locations, probed in order.
const BOLD_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

impl Assets {
    /// Resolve fonts, logo, and background from the config. Never fails;
    /// each missing piece is logged and replaced by its fallback behaviour.
    pub fn resolve(config: &ComposeConfig) -> Self {
        let regular = resolve_font(&config.font_regular_path, REGULAR_FALLBACKS);
        let bold = resolve_font(&config.font_bold_path, BOLD_FALLBACKS);
        if regular.is_none() && bold.is_none() {
            warn!(
                "No TTF font found (preferred '{}'); quotes will use built-in \
                 Helvetica, promo images will carry no text",
                config.font_regular_path.display()
            );
        }

        let logo_png = load_png_bytes(&config.logo_path);
        if logo_png.is_none() {
            warn!(
                "Logo '{}' not found or not a PNG; quotes render without it",
                config.logo_path.display()
            );
        }

        let background = match image::open(&config.background_path) {
            Ok(img) => {
                debug!(
                    "Background '{}' loaded ({}x{})",
                    config.background_path.display(),
                    img.width(),
                    img.height()
                );
                Some(img)
            }
            Err(_) => {
                warn!(
                    "Background '{}' not found; promo images use a gradient",
                    config.background_path.display()
                );
                None
            }
        };

        Self {
            regular,
            bold,
            logo_png,
            background,
        }
    }

    /// Raw PNG bytes of the logo, if present.
    pub fn logo_png(&self) -> Option<&[u8]> {
        self.logo_png.as_deref()
    }

    /// Decoded background image, if present.
    pub fn background(&self) -> Option<&DynamicImage> {
        self.background.as_ref()
    }

    /// True when at least one face is available for raster text drawing.
    pub fn has_raster_font(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    /// Bold face, falling back to regular when only one was found.
    pub fn bold_or_regular(&self) -> Option<&FontAsset> {
        self.bold.as_ref().or(self.regular.as_ref())
    }

    /// Regular face, falling back to bold when only one was found.
    pub fn regular_or_bold(&self) -> Option<&FontAsset> {
        self.regular.as_ref().or(self.bold.as_ref())
    }

    /// Width of `text` at `size_pt`, in points, for alignment on the PDF
    /// page. Uses real glyph metrics when a TTF resolved, otherwise the
    /// Helvetica approximation matching the built-in fallback face.
    pub fn text_width_pt(&self, text: &str, size_pt: f32, bold: bool) -> f32 {
        let face = if bold {
            self.bold_or_regular()
        } else {
            self.regular_or_bold()
        };
        match face {
            Some(f) => f.line_width(text, size_pt),
            None => approx_helvetica_width(text, size_pt),
        }
    }
}

fn resolve_font(preferred: &Path, fallbacks: &[&str]) -> Option<FontAsset> {
    if let Some(font) = FontAsset::load(preferred) {
        debug!("Using preferred font '{}'", preferred.display());
        return Some(font);
    }
    for candidate in fallbacks {
        if let Some(font) = FontAsset::load(Path::new(candidate)) {
            debug!(
                "Preferred font '{}' unavailable, using '{candidate}'",
                preferred.display()
            );
            return Some(font);
        }
    }
    None
}

/// Read a file and keep it only if it carries the PNG magic bytes. The PDF
/// embedder decodes PNG specifically, so other formats are rejected here
/// rather than failing mid-render.
fn load_png_bytes(path: &Path) -> Option<Vec<u8>> {
    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];
    let bytes = std::fs::read(path).ok()?;
    if bytes.len() < 4 || bytes[..4] != PNG_MAGIC {
        return None;
    }
    Some(bytes)
}

/// Approximate Helvetica advance widths, per character class.
///
/// Used only when no TTF resolved and the PDF falls back to the built-in
/// Helvetica family, which exposes no metrics through `printpdf`. Class
/// widths are in em and close enough for right-aligning amounts and
/// centering footer lines.
pub(crate) fn approx_helvetica_width(text: &str, size_pt: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
            'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '/' | ' ' => 0.35,
            'm' | 'w' | 'M' | 'W' | '@' => 0.89,
            'A'..='Z' | '0'..='9' => 0.67,
            _ => 0.55,
        })
        .sum();
    em * size_pt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_with_missing_paths_never_fails() {
        let config = ComposeConfig::builder()
            .assets_dir("/definitely/not/a/real/dir")
            .build()
            .unwrap();
        let assets = Assets::resolve(&config);
        // Fonts may still resolve via system fallbacks; logo and background
        // must be absent.
        assert!(assets.logo_png().is_none());
        assert!(assets.background().is_none());
    }

    #[test]
    fn approx_width_grows_with_text_and_size() {
        let short = approx_helvetica_width("abc", 10.0);
        let long = approx_helvetica_width("abcdef", 10.0);
        let big = approx_helvetica_width("abc", 20.0);
        assert!(long > short);
        assert!((big - short * 2.0).abs() < f32::EPSILON * 100.0);
    }

    #[test]
    fn non_png_logo_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"JFIF not a png").unwrap();
        assert!(load_png_bytes(&path).is_none());
    }
}
