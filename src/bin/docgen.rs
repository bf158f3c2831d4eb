//! CLI binary for artisan-docgen.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ComposeConfig`, reads JSON request payloads, and prints where the
//! finished artifacts landed.

use anyhow::{Context, Result};
use artisan_docgen::{
    ComposeConfig, DocStudio, MessageRequest, PromoRequest, QuoteRequest, RenderedArtifact,
};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Quote PDF from a JSON payload
  docgen quote devis.json

  # Same, with branded assets and a custom output directory
  docgen quote devis.json --assets-dir brand/ -o out/

  # Promo image with an AI-generated tagline (needs GEMINI_API_KEY)
  docgen promo promo.json

  # Promo image with an explicit tagline, no AI call
  docgen promo promo.json --tagline "L'Offre à ne pas Manquer !"

  # Marketing message (falls back to a static template without an API key)
  docgen message message.json

  # One assistant turn
  docgen chat "Comment relancer poliment un client ?"

PAYLOAD SHAPES (JSON):
  quote    {"document_label": "Devis", "client_name": "Awa", "issuer_name": "Koffi",
            "date": "2024-05-01", "items": [{"description": "Réparation", "price": "15000"}]}
  promo    {"issuer_name": "Chez Awa", "promo_text": "-50% sur les chaussures",
            "valid_until": "31/12"}
  message  {"name": "Koffi", "trade": "menuisier", "service": "Pose de portes",
            "offer": "-20% cette semaine"}

  Legacy French field names (client, artisan, nom, promo, date) are accepted.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY      Generative-text API key (assistant disabled without it)
  DOCGEN_MODEL        Override model ID (default: gemini-2.0-flash)
  DOCGEN_ASSETS_DIR   Directory holding logo.png, background.png, fonts/
  DOCGEN_OUTPUT_DIR   Where artifacts are written (default: generated/)

  All assets are optional: a missing logo is skipped, a missing background
  becomes a gradient, missing fonts fall back to system fonts.
"#;

/// Generate quote PDFs, promo images, and marketing text for small businesses.
#[derive(Parser, Debug)]
#[command(
    name = "docgen",
    version,
    about = "Generate quote/invoice PDFs and promotional images for small businesses",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding logo.png, background.png and fonts/.
    #[arg(long, global = true, env = "DOCGEN_ASSETS_DIR", default_value = "assets")]
    assets_dir: PathBuf,

    /// Output directory for generated artifacts.
    #[arg(short, long, global = true, env = "DOCGEN_OUTPUT_DIR", default_value = "generated")]
    out: PathBuf,

    /// Generative-text API key. Omit to disable the assistant.
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier for the generative-text provider.
    #[arg(long, global = true, env = "DOCGEN_MODEL", default_value = "gemini-2.0-flash")]
    model: String,

    /// Promo canvas edge in pixels (square), 256–4096.
    #[arg(long, global = true, env = "DOCGEN_CANVAS", default_value_t = 1080,
          value_parser = clap::value_parser!(u32).range(256..=4096))]
    canvas: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOCGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "DOCGEN_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a quote/invoice PDF from a JSON payload.
    Quote {
        /// Path to the QuoteRequest JSON file.
        input: PathBuf,
    },
    /// Compose a square promotional PNG from a JSON payload.
    Promo {
        /// Path to the PromoRequest JSON file.
        input: PathBuf,

        /// Use this tagline instead of generating one.
        #[arg(long)]
        tagline: Option<String>,
    },
    /// Generate a short marketing message from a JSON payload.
    Message {
        /// Path to the MessageRequest JSON file.
        input: PathBuf,
    },
    /// Ask the scoped assistant one question.
    Chat {
        /// The question, quoted.
        question: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut builder = ComposeConfig::builder()
        .assets_dir(&cli.assets_dir)
        .output_dir(&cli.out)
        .canvas_size(cli.canvas)
        .assistant_model(&cli.model);
    if let Some(ref key) = cli.api_key {
        builder = builder.assistant_api_key(key);
    }
    let config = builder.build().context("Invalid configuration")?;
    let studio = Arc::new(DocStudio::new(config));

    match cli.command {
        Command::Quote { input } => {
            let req: QuoteRequest = read_request(&input)?;
            let start = Instant::now();
            // Composition is CPU-bound; keep it off the async executor.
            let studio2 = Arc::clone(&studio);
            let (artifact, path) = tokio::task::spawn_blocking(move || studio2.quote_to_dir(&req))
                .await
                .context("Quote task panicked")?
                .context("Quote composition failed")?;
            report(cli.quiet, &artifact, &path.display().to_string(), start);
        }
        Command::Promo { input, tagline } => {
            let req: PromoRequest = read_request(&input)?;
            let start = Instant::now();
            let artifact = match tagline {
                Some(t) => {
                    let studio2 = Arc::clone(&studio);
                    tokio::task::spawn_blocking(move || studio2.promo(&req, &t))
                        .await
                        .context("Promo task panicked")?
                }
                // The assistant call is async; only the compose step that
                // follows is CPU-bound, and it is short at default sizes.
                None => studio.promo_with_ai(&req).await,
            }
            .context("Promo composition failed")?;
            let path = artifact
                .write_to_dir(&studio.config().output_dir)
                .context("Failed to write promo image")?;
            report(cli.quiet, &artifact, &path.display().to_string(), start);
        }
        Command::Message { input } => {
            let req: MessageRequest = read_request(&input)?;
            let text = studio.marketing_message(&req).await;
            println!("{text}");
            if !cli.quiet && !studio.has_assistant() {
                eprintln!("{}", dim("(static fallback — no API key configured)"));
            }
        }
        Command::Chat { question } => {
            let reply = studio.chat(&question).await;
            println!("{reply}");
        }
    }

    Ok(())
}

/// Read and deserialise a JSON request payload.
fn read_request<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid request JSON in {:?}", path))
}

fn report(quiet: bool, artifact: &RenderedArtifact, path: &str, start: Instant) {
    if quiet {
        return;
    }
    eprintln!(
        "{} {}  {}  {}",
        green("✔"),
        bold(path),
        dim(&format!("{} bytes", artifact.bytes().len())),
        dim(&format!("{}ms", start.elapsed().as_millis())),
    );
    eprintln!("   suggested download name: {}", artifact.download_name());
}
