//! # md2pdf
//!
//! Convert Markdown documents to PDF through a headless browser.
//!
//! ## Why this crate?
//!
//! Direct Markdown-to-PDF renderers typeset the text but lose everything the
//! web ecosystem does well — syntax highlighting, Mermaid diagrams, MathJax/
//! KaTeX formulae, and the familiar GitHub look. Instead this crate converts
//! Markdown to a complete styled HTML document and prints it with a
//! Chromium-family browser (or wkhtmltopdf as a fallback), so the PDF looks
//! exactly like the rendered preview.
//!
//! Before conversion, a list-normalization pass repairs the loosely indented
//! lists that LLMs and hurried humans produce, which CommonMark would
//! otherwise flatten into paragraphs.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Input      resolve local file or download from URL
//!  ├─ 2. Normalize  single-pass list-structure repair
//!  ├─ 3. HTML       comrak body + themed document template
//!  ├─ 4. Embed      optionally inline local images as data: URIs
//!  ├─ 5. Render     headless Chromium / wkhtmltopdf subprocess
//!  └─ 6. Output     PDF bytes + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2pdf::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("notes.md", &config).await?;
//!     std::fs::write("notes.pdf", &output.pdf)?;
//!     eprintln!("{} bytes via {}", output.stats.pdf_bytes, output.stats.engine);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2pdf` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! md2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod theme;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, Engine, MathEngine, Theme};
pub use convert::{convert, convert_many, convert_sync, convert_to_file, default_output_path};
pub use error::{FileError, Md2PdfError};
pub use output::{ConversionOutput, ConversionStats, FileResult};
pub use pipeline::normalize::normalize_lists;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
