//! CLI binary for md2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2pdf::{
    convert_many, convert_to_file, default_output_path, ConversionConfig,
    ConversionProgressCallback, Engine, MathEngine, ProgressCallback, Theme,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-file log
/// lines using [indicatif]. Works correctly when files complete out-of-order
/// (concurrent batch mode).
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of files that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_inputs: usize) {
        self.bar.set_length(total_inputs as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_inputs} files…"))
        ));
    }

    fn on_file_start(&self, input: &str, _total: usize) {
        self.bar.set_message(input.to_string());
    }

    fn on_file_complete(&self, input: &str, _total: usize, pdf_len: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            input,
            dim(&format!("{} KiB", pdf_len / 1024)),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, input: &str, _total: usize, error: String) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 120 {
            format!("{}\u{2026}", &error[..119])
        } else {
            error
        };

        self.bar
            .println(format!("  {} {}  {}", red("✗"), input, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_inputs: usize, success_count: usize) {
        let failed = total_inputs.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if failed == total_inputs {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_inputs,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes notes.pdf next to notes.md)
  md2pdf notes.md

  # Explicit output path
  md2pdf report.md -o out/report.pdf

  # Batch conversion, four at a time
  md2pdf docs/*.md --jobs 4

  # Convert from URL
  md2pdf https://raw.githubusercontent.com/rust-lang/rust/master/README.md

  # GitHub look, KaTeX math, custom margins
  md2pdf --theme github --math katex --margin "15mm 20mm" paper.md

  # Cover page and extra CSS
  md2pdf --cover cover.md --css brand.css handbook.md

  # Keep the intermediate HTML for inspection
  md2pdf --debug-html draft.md

  # JSON stats for scripting
  md2pdf --json report.md

RENDERING BACKENDS:
  Backend      Binary names probed                      JavaScript
  ─────────    ──────────────────────────────────────   ──────────
  chromium     chromium, chromium-browser, chrome,      ✓ (math,
               google-chrome, google-chrome-stable,       mermaid,
               msedge, microsoft-edge                     highlight)
  wkhtmltopdf  wkhtmltopdf                              ✗

  --engine auto (the default) prefers Chromium and falls back to
  wkhtmltopdf. Script-driven features (MathJax/KaTeX, Mermaid,
  highlight.js) need the Chromium backend and network access to
  their CDNs.

ENVIRONMENT VARIABLES:
  MD2PDF_OUTPUT            Default output path (single input only)
  MD2PDF_ENGINE            Backend: auto, chromium, wkhtmltopdf
  MD2PDF_THEME             Theme: mpe, github, minimal
  RUST_LOG                 Override the log filter (tracing syntax)
"#;

/// Convert Markdown files and URLs to PDF via a headless browser.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert Markdown files and URLs to PDF via a headless browser",
    long_about = "Convert Markdown documents (local files or URLs) to styled PDF. Markdown is \
rendered to HTML with GitHub-flavoured extensions, themed, and printed with a headless \
Chromium-family browser (or wkhtmltopdf), so syntax highlighting, Mermaid diagrams and \
MathJax/KaTeX formulae come out exactly as in the rendered preview.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file paths or HTTP/HTTPS URLs.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output PDF path. Only valid with a single input; batches write each
    /// PDF next to its source.
    #[arg(short, long, env = "MD2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Document title for the HTML <title> element.
    #[arg(long, default_value = "Document")]
    title: String,

    /// Extra CSS file appended after the theme styles.
    #[arg(long)]
    css: Option<PathBuf>,

    /// Rendering backend.
    #[arg(long, env = "MD2PDF_ENGINE", value_enum, default_value = "auto")]
    engine: EngineArg,

    /// Page size keyword (A4, Letter, Legal, ...).
    #[arg(long, default_value = "A4")]
    page_size: String,

    /// Page margin as CSS shorthand: "20mm", "20mm 15mm", or
    /// "1in 2in 3in 4in".
    #[arg(long, default_value = "20mm")]
    margin: String,

    /// Math rendering engine.
    #[arg(long, value_enum, default_value = "mathjax")]
    math: MathArg,

    /// Disable Mermaid diagram rendering.
    #[arg(long)]
    no_mermaid: bool,

    /// Cover Markdown file prepended to each input, separated by a page break.
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Styling theme.
    #[arg(long, env = "MD2PDF_THEME", value_enum, default_value = "mpe")]
    theme: ThemeArg,

    /// Write the intermediate HTML next to the output PDF.
    #[arg(long)]
    debug_html: bool,

    /// Inline local images as base64 data: URIs.
    #[arg(long)]
    embed_images: bool,

    /// Number of concurrent conversions in batch mode.
    #[arg(short, long, env = "MD2PDF_JOBS", default_value_t = 2)]
    jobs: usize,

    /// Output per-file statistics as JSON instead of the human summary.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "MD2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "MD2PDF_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum EngineArg {
    Auto,
    Chromium,
    Wkhtmltopdf,
}

impl From<EngineArg> for Engine {
    fn from(v: EngineArg) -> Self {
        match v {
            EngineArg::Auto => Engine::Auto,
            EngineArg::Chromium => Engine::Chromium,
            EngineArg::Wkhtmltopdf => Engine::Wkhtmltopdf,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum MathArg {
    None,
    Mathjax,
    Katex,
}

impl From<MathArg> for MathEngine {
    fn from(v: MathArg) -> Self {
        match v {
            MathArg::None => MathEngine::None,
            MathArg::Mathjax => MathEngine::MathJax,
            MathArg::Katex => MathEngine::Katex,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ThemeArg {
    Mpe,
    Github,
    Minimal,
}

impl From<ThemeArg> for Theme {
    fn from(v: ThemeArg) -> Self {
        match v {
            ThemeArg::Mpe => Theme::Mpe,
            ThemeArg::Github => Theme::Github,
            ThemeArg::Minimal => Theme::Minimal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.inputs.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.output.is_some() && cli.inputs.len() > 1 {
        anyhow::bail!(
            "--output only makes sense with a single input; \
             batches write each PDF next to its source"
        );
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.inputs.len() == 1 {
        let input = &cli.inputs[0];
        let output_path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(input));

        let stats = convert_to_file(input, &output_path, &config)
            .await
            .context("Conversion failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
            );
        } else if !cli.quiet {
            eprintln!(
                "{}  {}ms  {}  →  {}",
                green("✔"),
                stats.total_duration_ms,
                dim(&format!("{} KiB via {}", stats.pdf_bytes / 1024, stats.engine)),
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(());
    }

    let results = convert_many(&cli.inputs, &config)
        .await
        .context("Batch conversion failed")?;

    if cli.json {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "input": r.input,
                    "output": r.output_path,
                    "stats": r.stats,
                    "error": r.error.as_ref().map(|e| e.to_string()),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).context("Failed to serialise results")?
        );
    } else if !cli.quiet && !show_progress {
        // The progress callback already printed per-file lines.
        for r in &results {
            match (&r.output_path, &r.error) {
                (Some(path), _) => {
                    eprintln!("{} {} → {}", green("✓"), r.input, path.display())
                }
                (None, Some(e)) => eprintln!("{} {}", red("✗"), e),
                (None, None) => {}
            }
        }
    }

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .engine(cli.engine.clone().into())
        .title(&cli.title)
        .page_size(&cli.page_size)
        .margin(&cli.margin)
        .math(cli.math.clone().into())
        .mermaid(!cli.no_mermaid)
        .theme(cli.theme.clone().into())
        .embed_images(cli.embed_images)
        .debug_html(cli.debug_html)
        .concurrency(cli.jobs)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref css) = cli.css {
        builder = builder.css(css);
    }
    if let Some(ref cover) = cli.cover {
        builder = builder.cover(cover);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
