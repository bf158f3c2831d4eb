//! Quote/invoice PDF composition on a fixed A4 page.
//!
//! The layout is a fixed template: header (logo + issuer), title with
//! divider, CLIENT/DATE block, itemised table with zebra striping, a
//! highlighted total, and a centered footer. All geometry lives in the
//! `layout` constants below — deployments tune colors and coordinates there,
//! not in the drawing code.
//!
//! Degradation contract: a missing logo or font changes how the page looks,
//! never whether it renders. A price string that does not parse is shown
//! verbatim in its row and contributes zero to the total. The only failure
//! this module can return is a PDF serialisation error.

use crate::artifact::{MediaType, RenderedArtifact};
use crate::assets::Assets;
use crate::compose::textutil::safe_parse_money;
use crate::config::ComposeConfig;
use crate::error::ComposeError;
use crate::request::{LineItem, QuoteRequest};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rect, Rgb,
};
use std::io::Cursor;
use tracing::{debug, warn};

/// Points to millimetres (PDF text sizes are in pt, page geometry in mm).
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Page geometry and palette. Coordinates are millimetres from the
/// bottom-left corner of an A4 page.
mod layout {
    pub const PAGE_W: f32 = 210.0;
    pub const PAGE_H: f32 = 297.0;
    pub const MARGIN: f32 = 18.0;

    pub const LOGO_WIDTH: f32 = 26.0;
    pub const LOGO_TOP: f32 = PAGE_H - 12.0;

    pub const ISSUER_LABEL_Y: f32 = PAGE_H - 22.0;
    pub const ISSUER_NAME_Y: f32 = PAGE_H - 27.5;

    pub const TITLE_Y: f32 = PAGE_H - 53.0;
    pub const TITLE_RULE_Y: f32 = PAGE_H - 55.5;

    pub const CLIENT_Y: f32 = PAGE_H - 67.0;
    pub const DATE_Y: f32 = PAGE_H - 81.0;
    pub const VALUE_X: f32 = MARGIN + 36.0;

    pub const TABLE_HEADER_TOP: f32 = PAGE_H - 92.0;
    pub const TABLE_HEADER_HEIGHT: f32 = 9.0;
    pub const ROW_START_Y: f32 = PAGE_H - 108.5;
    pub const ROW_HEIGHT: f32 = 7.5;
    pub const CELL_INSET: f32 = 4.0;

    pub const TOTAL_BAND_HEIGHT: f32 = 10.0;
    pub const TOTAL_GAP: f32 = 6.0;

    pub const FOOTER_TRUST_Y: f32 = 35.0;
    pub const FOOTER_VALIDITY_Y: f32 = 30.0;
    pub const FOOTER_THANKS_Y: f32 = 18.0;

    // Font sizes in points.
    pub const SIZE_TITLE: f32 = 22.0;
    pub const SIZE_ISSUER_LABEL: f32 = 10.0;
    pub const SIZE_ISSUER: f32 = 12.0;
    pub const SIZE_BODY: f32 = 11.0;
    pub const SIZE_TOTAL: f32 = 14.0;
    pub const SIZE_FOOTER: f32 = 9.0;
    pub const SIZE_THANKS: f32 = 10.0;

    // Palette, linear RGB in 0.0–1.0.
    pub const INK: (f32, f32, f32) = (0.10, 0.11, 0.13);
    pub const HEADER_BAR: (f32, f32, f32) = (0.16, 0.21, 0.30);
    pub const HEADER_TEXT: (f32, f32, f32) = (1.0, 1.0, 1.0);
    pub const ZEBRA: (f32, f32, f32) = (0.93, 0.94, 0.96);
    pub const TOTAL_BAND: (f32, f32, f32) = (0.88, 0.92, 0.97);
    pub const RULE: (f32, f32, f32) = (0.25, 0.27, 0.32);
}

/// Compose a quote/invoice PDF from the request.
///
/// Never fails for malformed prices, an empty item list, or missing optional
/// assets; only PDF serialisation errors propagate. A list longer than the
/// table region overflows it visually — an accepted limitation of the fixed
/// template, not an error.
pub fn compose_quote(
    req: &QuoteRequest,
    assets: &Assets,
    config: &ComposeConfig,
) -> Result<RenderedArtifact, ComposeError> {
    use layout::*;

    let title = req.document_label.trim().to_uppercase();
    let (doc, page_idx, layer_idx) =
        PdfDocument::new(&title, Mm(PAGE_W), Mm(PAGE_H), "content");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let regular = match assets.regular_or_bold() {
        Some(f) => doc
            .add_external_font(f.data())
            .map_err(|e| pdf_err(format!("embedding regular font: {e}")))?,
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_err(format!("builtin Helvetica: {e}")))?,
    };
    let bold = match assets.bold_or_regular() {
        Some(f) => doc
            .add_external_font(f.data())
            .map_err(|e| pdf_err(format!("embedding bold font: {e}")))?,
        None => doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| pdf_err(format!("builtin Helvetica-Bold: {e}")))?,
    };

    let page = Canvas {
        layer,
        regular,
        bold,
        assets,
    };

    // 1. Logo, best-effort.
    place_logo(&page, assets);

    // 2. "Prepared by" block, right-aligned.
    page.fill(INK);
    page.text_right("Préparé par :", SIZE_ISSUER_LABEL, PAGE_W - MARGIN, ISSUER_LABEL_Y, false);
    page.text_right(
        &req.issuer_name.to_uppercase(),
        SIZE_ISSUER,
        PAGE_W - MARGIN,
        ISSUER_NAME_Y,
        true,
    );

    // 3. Title and divider rule.
    page.text(&title, SIZE_TITLE, MARGIN, TITLE_Y, true);
    page.rule(MARGIN, PAGE_W - MARGIN, TITLE_RULE_Y);

    // 4. CLIENT / DATE block.
    page.text("CLIENT :", SIZE_BODY, MARGIN, CLIENT_Y, false);
    page.text(&req.client_name, SIZE_BODY, VALUE_X, CLIENT_Y, true);
    page.text("DATE :", SIZE_BODY, MARGIN, DATE_Y, false);
    page.text(&req.date, SIZE_BODY, VALUE_X, DATE_Y, true);

    // 5. Table header bar.
    page.fill(HEADER_BAR);
    page.filled_rect(
        MARGIN,
        TABLE_HEADER_TOP - TABLE_HEADER_HEIGHT,
        PAGE_W - MARGIN,
        TABLE_HEADER_TOP,
    );
    page.fill(HEADER_TEXT);
    let header_baseline = TABLE_HEADER_TOP - TABLE_HEADER_HEIGHT + 3.0;
    page.text("Description", SIZE_BODY, MARGIN + CELL_INSET, header_baseline, true);
    page.text_right(
        &format!("Montant ({})", config.currency_label),
        SIZE_BODY,
        PAGE_W - MARGIN - CELL_INSET,
        header_baseline,
        true,
    );

    // 6. Item rows, zebra-striped, prices rendered verbatim.
    let mut y = ROW_START_Y;
    for (i, item) in req.items.iter().enumerate() {
        if i % 2 == 1 {
            page.fill(ZEBRA);
            page.filled_rect(MARGIN, y - 2.2, PAGE_W - MARGIN, y + ROW_HEIGHT - 2.2);
        }
        page.fill(INK);
        page.text(&item.description, SIZE_BODY, MARGIN + CELL_INSET, y, false);
        page.text_right(&item.price, SIZE_BODY, PAGE_W - MARGIN - CELL_INSET, y, false);
        y -= ROW_HEIGHT;
    }

    // 7. Total band.
    let total = items_total(&req.items);
    let band_top = y - TOTAL_GAP + ROW_HEIGHT;
    page.fill(TOTAL_BAND);
    page.filled_rect(MARGIN, band_top - TOTAL_BAND_HEIGHT, PAGE_W - MARGIN, band_top);
    page.fill(INK);
    page.text_right(
        &format!("TOTAL : {:.0} {}", total, config.currency_label),
        SIZE_TOTAL,
        PAGE_W - MARGIN - CELL_INSET,
        band_top - TOTAL_BAND_HEIGHT + 3.0,
        true,
    );
    debug!(total, items = req.items.len(), "quote table composed");

    // 8. Footer: trust lines + centered thank-you.
    page.text(&config.trust_line, SIZE_FOOTER, MARGIN, FOOTER_TRUST_Y, false);
    page.text(&config.validity_line, SIZE_FOOTER, MARGIN, FOOTER_VALIDITY_Y, false);
    page.text_centered(
        &config.thank_you_line,
        SIZE_THANKS,
        PAGE_W / 2.0,
        FOOTER_THANKS_Y,
        true,
    );

    // 9. Serialise.
    let bytes = doc
        .save_to_bytes()
        .map_err(|e| pdf_err(format!("save_to_bytes: {e}")))?;

    let prefix = crate::artifact::sanitize_stem(&req.document_label.trim().to_lowercase());
    let stem = format!("{}_{}", capitalize(req.document_label.trim()), req.client_name);
    Ok(RenderedArtifact::new(MediaType::Pdf, prefix, &stem, bytes))
}

/// Sum of the parseable item prices. Unparsable prices contribute zero.
pub(crate) fn items_total(items: &[LineItem]) -> f64 {
    items.iter().map(|i| safe_parse_money(&i.price)).sum()
}

fn pdf_err(detail: String) -> ComposeError {
    ComposeError::PdfRender { detail }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Drawing surface bundling the layer, the two resolved faces, and the
/// metrics needed for right-aligned and centered text.
struct Canvas<'a> {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    assets: &'a Assets,
}

impl Canvas<'_> {
    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    fn text(&self, s: &str, size: f32, x: f32, y: f32, bold: bool) {
        self.layer.use_text(s, size, Mm(x), Mm(y), self.font(bold));
    }

    fn text_right(&self, s: &str, size: f32, right_x: f32, y: f32, bold: bool) {
        let w_mm = self.assets.text_width_pt(s, size, bold) * PT_TO_MM;
        self.text(s, size, right_x - w_mm, y, bold);
    }

    fn text_centered(&self, s: &str, size: f32, center_x: f32, y: f32, bold: bool) {
        let w_mm = self.assets.text_width_pt(s, size, bold) * PT_TO_MM;
        self.text(s, size, center_x - w_mm / 2.0, y, bold);
    }

    fn fill(&self, (r, g, b): (f32, f32, f32)) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn filled_rect(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer
            .add_rect(Rect::new(Mm(x1), Mm(y1), Mm(x2), Mm(y2)).with_mode(PaintMode::Fill));
    }

    fn rule(&self, x1: f32, x2: f32, y: f32) {
        let (r, g, b) = layout::RULE;
        self.layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer.set_outline_thickness(0.6);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
        });
    }
}

/// Place the business logo at its fixed anchor. Any decode problem is logged
/// and skipped; logo placement must never abort the render.
fn place_logo(page: &Canvas<'_>, assets: &Assets) {
    use layout::{LOGO_TOP, LOGO_WIDTH, MARGIN};

    let Some(bytes) = assets.logo_png() else {
        return;
    };
    let decoder = match PngDecoder::new(Cursor::new(bytes)) {
        Ok(d) => d,
        Err(e) => {
            warn!("Logo PNG decode failed, rendering without it: {e}");
            return;
        }
    };
    let image = match printpdf::Image::try_from(decoder) {
        Ok(img) => img,
        Err(e) => {
            warn!("Logo could not be embedded, rendering without it: {e}");
            return;
        }
    };

    let px_w = image.image.width.0.max(1) as f32;
    let px_h = image.image.height.0.max(1) as f32;
    // Scale via DPI so the logo prints LOGO_WIDTH mm wide.
    let dpi = px_w * 25.4 / LOGO_WIDTH;
    let height_mm = px_h * 25.4 / dpi;

    image.add_to_layer(
        page.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(LOGO_TOP - height_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, price: &str) -> LineItem {
        LineItem {
            description: description.to_string(),
            price: price.to_string(),
        }
    }

    #[test]
    fn total_normalises_separators() {
        // "5,000" carries a thousands separator, not a decimal comma.
        let items = vec![item("Réparation", "15000"), item("Pièces", "5,000")];
        let total = items_total(&items);
        assert_eq!(format!("{total:.0}"), "20000");
    }

    #[test]
    fn total_skips_unparsable_prices() {
        let items = vec![item("Main d'œuvre", "12.5"), item("Divers", "sur devis")];
        assert_eq!(items_total(&items), 12.5);
    }

    #[test]
    fn total_of_empty_list_is_zero() {
        assert_eq!(items_total(&[]), 0.0);
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("devis"), "Devis");
        assert_eq!(capitalize(""), "");
    }
}
