//! Configuration types for Markdown-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across a batch run, serialise the relevant
//! parts for logging, and diff two runs to understand why their outputs
//! differ.
//!
//! # Design choice: builder over constructor
//! A fifteen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::Md2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a Markdown-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2pdf::{ConversionConfig, Engine, Theme};
///
/// let config = ConversionConfig::builder()
///     .engine(Engine::Chromium)
///     .theme(Theme::Github)
///     .page_size("A4")
///     .margin("20mm 15mm")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// PDF rendering backend. Default: [`Engine::Auto`].
    ///
    /// `Auto` prefers a Chromium-family browser (full JavaScript support, so
    /// MathJax/KaTeX and Mermaid render) and falls back to `wkhtmltopdf`.
    pub engine: Engine,

    /// Document title placed in the HTML `<title>`. Default: "Document".
    pub title: String,

    /// Page size passed to the backend (CSS `@page size` keyword or
    /// wkhtmltopdf `--page-size`). Default: "A4".
    pub page_size: String,

    /// Page margin as CSS shorthand ("top", "top right", or
    /// "top right bottom left"). Default: "20mm".
    pub margin: String,

    /// Math rendering engine injected into the HTML. Default: [`MathEngine::MathJax`].
    ///
    /// Math is JavaScript-driven; it only renders with a Chromium backend.
    pub math: MathEngine,

    /// Transform ` ```mermaid ` code blocks into rendered diagrams.
    /// Default: true. Like math, requires a JavaScript-capable backend.
    pub mermaid: bool,

    /// Styling theme. Default: [`Theme::Mpe`].
    pub theme: Theme,

    /// Optional extra CSS file appended after the theme styles.
    pub css: Option<PathBuf>,

    /// Optional cover Markdown file, prepended to each input and separated
    /// by a page break.
    pub cover: Option<PathBuf>,

    /// Override the `<base href>` of the generated HTML.
    ///
    /// Defaults to the input file's parent directory as a `file://` URL so
    /// relative image paths resolve. URL inputs get no base tag unless this
    /// is set.
    pub base_url: Option<String>,

    /// Inline local images referenced by the HTML as base64 `data:` URIs.
    /// Default: false.
    ///
    /// Useful when the backend's local-file access is sandboxed away; costs
    /// roughly 4/3 of the image bytes in HTML size.
    pub embed_images: bool,

    /// Write the intermediate HTML next to the output PDF. Default: false.
    pub debug_html: bool,

    /// Number of inputs converted concurrently in batch mode. Default: 2.
    ///
    /// Each conversion spawns a whole backend subprocess; a Chromium instance
    /// costs hundreds of MB, so this is deliberately conservative.
    pub concurrency: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-render backend subprocess timeout in seconds. Default: 120.
    pub render_timeout_secs: u64,

    /// Optional per-file progress callback for batch conversions.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Auto,
            title: "Document".to_string(),
            page_size: "A4".to_string(),
            margin: "20mm".to_string(),
            math: MathEngine::default(),
            mermaid: true,
            theme: Theme::default(),
            css: None,
            cover: None,
            base_url: None,
            embed_images: false,
            debug_html: false,
            concurrency: 2,
            download_timeout_secs: 120,
            render_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("engine", &self.engine)
            .field("title", &self.title)
            .field("page_size", &self.page_size)
            .field("margin", &self.margin)
            .field("math", &self.math)
            .field("mermaid", &self.mermaid)
            .field("theme", &self.theme)
            .field("css", &self.css)
            .field("cover", &self.cover)
            .field("base_url", &self.base_url)
            .field("embed_images", &self.embed_images)
            .field("debug_html", &self.debug_html)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn engine(mut self, engine: Engine) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn page_size(mut self, size: impl Into<String>) -> Self {
        self.config.page_size = size.into();
        self
    }

    pub fn margin(mut self, margin: impl Into<String>) -> Self {
        self.config.margin = margin.into();
        self
    }

    pub fn math(mut self, math: MathEngine) -> Self {
        self.config.math = math;
        self
    }

    pub fn mermaid(mut self, enabled: bool) -> Self {
        self.config.mermaid = enabled;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.config.theme = theme;
        self
    }

    pub fn css(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.css = Some(path.into());
        self
    }

    pub fn cover(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cover = Some(path.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn embed_images(mut self, v: bool) -> Self {
        self.config.embed_images = v;
        self
    }

    pub fn debug_html(mut self, v: bool) -> Self {
        self.config.debug_html = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn render_timeout_secs(mut self, secs: u64) -> Self {
        self.config.render_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2PdfError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(Md2PdfError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        if c.page_size.trim().is_empty() {
            return Err(Md2PdfError::InvalidConfig("Page size must not be empty".into()));
        }
        if c.margin.split_whitespace().count() == 0 {
            return Err(Md2PdfError::InvalidConfig(
                "Margin must contain at least one CSS length".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which external backend turns the assembled HTML into PDF bytes.
///
/// Both backends are driven as subprocesses and treated as black boxes that
/// either produce a PDF file or fail. The difference that matters to callers
/// is JavaScript: Chromium executes the page (MathJax, KaTeX, Mermaid,
/// highlight.js all render), wkhtmltopdf's engine is too old for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Engine {
    /// Prefer Chromium, fall back to wkhtmltopdf. (default)
    #[default]
    Auto,
    /// Headless Chromium-family browser via `--print-to-pdf`.
    Chromium,
    /// `wkhtmltopdf` CSS-print engine.
    Wkhtmltopdf,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Auto => write!(f, "auto"),
            Engine::Chromium => write!(f, "chromium"),
            Engine::Wkhtmltopdf => write!(f, "wkhtmltopdf"),
        }
    }
}

/// Math rendering engine injected into the HTML head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MathEngine {
    /// No math scripts injected.
    None,
    /// MathJax 3 from CDN. (default)
    #[default]
    MathJax,
    /// KaTeX + auto-render extension from CDN.
    Katex,
}

/// Styling theme for the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    /// Markdown-Preview-Enhanced-style typography on top of
    /// github-markdown-css. (default)
    #[default]
    Mpe,
    /// Plain github-markdown-css.
    Github,
    /// Base stylesheet only, no external theme.
    Minimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let config = ConversionConfig::builder().build().unwrap();
        assert_eq!(config.engine, Engine::Auto);
        assert_eq!(config.page_size, "A4");
        assert_eq!(config.margin, "20mm");
        assert_eq!(config.math, MathEngine::MathJax);
        assert!(config.mermaid);
        assert_eq!(config.theme, Theme::Mpe);
    }

    #[test]
    fn concurrency_setter_clamps_to_one() {
        let config = ConversionConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn empty_page_size_is_rejected() {
        let mut config = ConversionConfig::default();
        config.page_size = "  ".into();
        let err = ConversionConfigBuilder { config }.build();
        assert!(matches!(err, Err(Md2PdfError::InvalidConfig(_))));
    }

    #[test]
    fn engine_display_names_match_cli_values() {
        assert_eq!(Engine::Auto.to_string(), "auto");
        assert_eq!(Engine::Chromium.to_string(), "chromium");
        assert_eq!(Engine::Wkhtmltopdf.to_string(), "wkhtmltopdf");
    }
}
