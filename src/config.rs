//! Configuration for the composers and the assistant client.
//!
//! All behaviour is controlled through [`ComposeConfig`], built via its
//! [`ComposeConfigBuilder`] and constructed **once** at process start. The
//! resolved value is passed by reference into both composers — there are no
//! ambient globals and no per-call re-resolution of fonts or assets.
//!
//! Cosmetic layout differences between deployments (colors, banner label,
//! currency, footer wording) are plain fields here, not separate code paths.

use crate::error::ComposeError;
use std::path::PathBuf;

/// An RGB triple used for configurable colors.
pub type Rgb8 = [u8; 3];

/// Configuration for quote and promo composition.
///
/// Built via [`ComposeConfig::builder()`] or [`ComposeConfig::default()`].
///
/// # Example
/// ```rust
/// use artisan_docgen::ComposeConfig;
///
/// let config = ComposeConfig::builder()
///     .assets_dir("assets")
///     .canvas_size(1080)
///     .overlay_opacity(0.6)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// Business logo placed at the top of the quote PDF. Optional: a missing
    /// file degrades to no logo, never an error.
    pub logo_path: PathBuf,

    /// Background image for the promo canvas. Optional: a missing file
    /// degrades to a synthesised vertical gradient.
    pub background_path: PathBuf,

    /// Preferred regular-weight TTF. Optional: falls back to well-known
    /// system fonts, then to the PDF built-in Helvetica family.
    pub font_regular_path: PathBuf,

    /// Preferred bold-weight TTF. Same fallback policy as the regular face.
    pub font_bold_path: PathBuf,

    /// Directory artifacts are persisted into by the `*_to_dir` entry points.
    pub output_dir: PathBuf,

    /// Square promo canvas edge in pixels. Range: 256–4096. Default: 1080.
    ///
    /// 1080×1080 matches the social-media square format the images are made
    /// for. All promo layout offsets scale linearly with this value.
    pub canvas_size: u32,

    /// Opacity of the dark legibility overlay over the promo background,
    /// 0.0–1.0. Default: 0.55.
    ///
    /// Backgrounds are arbitrary user imagery; without the overlay, white
    /// text is unreadable on light photos. ~55% keeps the background visible
    /// while guaranteeing contrast.
    pub overlay_opacity: f32,

    /// Top color of the fallback gradient background (dark).
    pub gradient_top: Rgb8,

    /// Bottom color of the fallback gradient background (lighter).
    pub gradient_bottom: Rgb8,

    /// Label on the promo banner strip, drawn uppercased.
    pub banner_label: String,

    /// Fill color of the promo banner strip.
    pub banner_color: Rgb8,

    /// Currency label appended to amounts, e.g. "FCFA".
    pub currency_label: String,

    /// Small-print trust statement in the quote footer.
    pub trust_line: String,

    /// Small-print validity statement in the quote footer.
    pub validity_line: String,

    /// Bold, centered thank-you line at the bottom of the quote.
    pub thank_you_line: String,

    /// API key for the generative-text provider. None disables the
    /// assistant; every assistant operation then uses its static fallback.
    pub assistant_api_key: Option<String>,

    /// Model identifier sent to the provider. Default: "gemini-2.0-flash".
    pub assistant_model: String,

    /// Override the provider base URL (used by tests against a mock server).
    pub assistant_endpoint: Option<String>,

    /// Per-call timeout for assistant requests, in seconds. Default: 20.
    pub api_timeout_secs: u64,

    /// Retry attempts on a transient assistant failure. Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (doubles per attempt). Default: 500.
    pub retry_backoff_ms: u64,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from("assets/logo.png"),
            background_path: PathBuf::from("assets/background.png"),
            font_regular_path: PathBuf::from("assets/fonts/Poppins-Regular.ttf"),
            font_bold_path: PathBuf::from("assets/fonts/Poppins-Bold.ttf"),
            output_dir: PathBuf::from("generated"),
            canvas_size: 1080,
            overlay_opacity: 0.55,
            gradient_top: [16, 24, 48],
            gradient_bottom: [46, 102, 128],
            banner_label: "OFFRE SPÉCIALE".to_string(),
            banner_color: [230, 126, 34],
            currency_label: "FCFA".to_string(),
            trust_line: "Pourquoi nous choisir ? Nous garantissons un travail de qualité, \
                         un respect des délais et un service client irréprochable."
                .to_string(),
            validity_line: "Ce devis est valable 30 jours.".to_string(),
            thank_you_line: "Merci pour votre confiance !".to_string(),
            assistant_api_key: None,
            assistant_model: "gemini-2.0-flash".to_string(),
            assistant_endpoint: None,
            api_timeout_secs: 20,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl ComposeConfig {
    /// Create a new builder.
    pub fn builder() -> ComposeConfigBuilder {
        ComposeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ComposeConfig`].
#[derive(Debug)]
pub struct ComposeConfigBuilder {
    config: ComposeConfig,
}

impl ComposeConfigBuilder {
    /// Point all four asset paths at their conventional locations under `dir`
    /// (`logo.png`, `background.png`, `fonts/Poppins-{Regular,Bold}.ttf`).
    pub fn assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.config.logo_path = dir.join("logo.png");
        self.config.background_path = dir.join("background.png");
        self.config.font_regular_path = dir.join("fonts/Poppins-Regular.ttf");
        self.config.font_bold_path = dir.join("fonts/Poppins-Bold.ttf");
        self
    }

    pub fn logo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.logo_path = path.into();
        self
    }

    pub fn background_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.background_path = path.into();
        self
    }

    pub fn font_regular_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_regular_path = path.into();
        self
    }

    pub fn font_bold_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_bold_path = path.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn canvas_size(mut self, px: u32) -> Self {
        self.config.canvas_size = px.clamp(256, 4096);
        self
    }

    pub fn overlay_opacity(mut self, opacity: f32) -> Self {
        self.config.overlay_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn gradient(mut self, top: Rgb8, bottom: Rgb8) -> Self {
        self.config.gradient_top = top;
        self.config.gradient_bottom = bottom;
        self
    }

    pub fn banner_label(mut self, label: impl Into<String>) -> Self {
        self.config.banner_label = label.into();
        self
    }

    pub fn banner_color(mut self, color: Rgb8) -> Self {
        self.config.banner_color = color;
        self
    }

    pub fn currency_label(mut self, label: impl Into<String>) -> Self {
        self.config.currency_label = label.into();
        self
    }

    pub fn trust_line(mut self, line: impl Into<String>) -> Self {
        self.config.trust_line = line.into();
        self
    }

    pub fn validity_line(mut self, line: impl Into<String>) -> Self {
        self.config.validity_line = line.into();
        self
    }

    pub fn thank_you_line(mut self, line: impl Into<String>) -> Self {
        self.config.thank_you_line = line.into();
        self
    }

    pub fn assistant_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.assistant_api_key = Some(key.into());
        self
    }

    pub fn assistant_model(mut self, model: impl Into<String>) -> Self {
        self.config.assistant_model = model.into();
        self
    }

    pub fn assistant_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.assistant_endpoint = Some(url.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ComposeConfig, ComposeError> {
        let c = &self.config;
        if !(256..=4096).contains(&c.canvas_size) {
            return Err(ComposeError::InvalidConfig(format!(
                "canvas_size must be 256–4096, got {}",
                c.canvas_size
            )));
        }
        if !(0.0..=1.0).contains(&c.overlay_opacity) {
            return Err(ComposeError::InvalidConfig(format!(
                "overlay_opacity must be 0.0–1.0, got {}",
                c.overlay_opacity
            )));
        }
        if c.currency_label.trim().is_empty() {
            return Err(ComposeError::InvalidConfig(
                "currency_label must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_out_of_range_values() {
        let config = ComposeConfig::builder()
            .canvas_size(10)
            .overlay_opacity(3.0)
            .build()
            .unwrap();
        assert_eq!(config.canvas_size, 256);
        assert_eq!(config.overlay_opacity, 1.0);
    }

    #[test]
    fn assets_dir_rewrites_all_asset_paths() {
        let config = ComposeConfig::builder().assets_dir("/srv/brand").build().unwrap();
        assert_eq!(config.logo_path, PathBuf::from("/srv/brand/logo.png"));
        assert_eq!(
            config.font_bold_path,
            PathBuf::from("/srv/brand/fonts/Poppins-Bold.ttf")
        );
    }

    #[test]
    fn empty_currency_label_is_rejected() {
        let err = ComposeConfig::builder().currency_label("  ").build();
        assert!(matches!(err, Err(ComposeError::InvalidConfig(_))));
    }
}
