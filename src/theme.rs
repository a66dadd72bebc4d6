//! Stylesheet and CDN asset constants for the generated HTML.
//!
//! Everything here is a plain string constant so the assembled document is
//! reproducible and diffable. The base stylesheet is always present; theme
//! CSS layers on top of it, then any user-supplied CSS file.

use crate::config::Theme;

/// highlight.js stylesheet (GitHub light).
pub const HIGHLIGHT_CSS_HREF: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github.min.css";

/// highlight.js runtime.
pub const HIGHLIGHT_JS_SRC: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js";

/// github-markdown-css, shared by the `github` and `mpe` themes.
pub const GITHUB_MARKDOWN_CSS_HREF: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/github-markdown-css/5.2.0/github-markdown.min.css";

/// Mermaid runtime.
pub const MERMAID_JS_SRC: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

/// MathJax 3 (TeX input, CHTML output).
pub const MATHJAX_JS_SRC: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";

/// KaTeX stylesheet, runtime, and auto-render extension.
pub const KATEX_CSS_HREF: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css";
pub const KATEX_JS_SRC: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js";
pub const KATEX_AUTO_JS_SRC: &str =
    "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js";

/// Base stylesheet present in every document regardless of theme.
pub const DEFAULT_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, 'Noto Sans', 'Liberation Sans', sans-serif; color: #24292e; }
.markdown-body { max-width: 900px; margin: 0 auto; padding: 0; }
.markdown-body h1, .markdown-body h2, .markdown-body h3 { border-bottom: 1px solid #eaecef; padding-bottom: .3em; }
.markdown-body pre { background: #f6f8fa; padding: 12px; overflow: auto; }
.markdown-body code { font-family: ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, 'Liberation Mono', 'Courier New', monospace; }
.page-break { page-break-before: always; }
img { max-width: 100%; }
table { border-collapse: collapse; }
table th, table td { border: 1px solid #d0d7de; padding: 6px 12px; }
"#;

/// Markdown-Preview-Enhanced-style typography layered over github-markdown-css.
pub const MPE_CSS: &str = r#"
/* headings */
.markdown-body h1 { font-weight: 800; font-size: 2.0rem; }
.markdown-body h2 { font-weight: 700; font-size: 1.6rem; }
.markdown-body h3 { font-weight: 700; font-size: 1.25rem; }
.markdown-body h1, .markdown-body h2, .markdown-body h3 { margin-top: 1.2em; }

/* paragraph and list */
.markdown-body { line-height: 1.8; font-size: 16px; }
.markdown-body strong { font-weight: 700; }
.markdown-body ul, .markdown-body ol { margin: .6em 0; list-style-position: outside; }
.markdown-body ul { padding-left: 1.8rem; list-style-type: disc; }
.markdown-body ol { padding-left: 2.0rem; }
.markdown-body ol > li, .markdown-body ul > li { margin: .3em 0; }
.markdown-body ol ol, .markdown-body ol ul, .markdown-body ul ol, .markdown-body ul ul { margin: .2em 0; padding-left: 1.4rem; }
.markdown-body ul ul { list-style-type: circle; }
.markdown-body ul ul ul { list-style-type: square; }
.markdown-body li > p { margin: .2em 0; }
.markdown-body li::marker { font-weight: 700; }

/* blockquote */
.markdown-body blockquote { background: #f6f8fa; border-left: 4px solid #d0d7de; margin: 1em 0; padding: .6em 1em; }

/* code */
.markdown-body pre code { background: transparent; }
.markdown-body code { background: rgba(175,184,193,0.2); padding: .2em .4em; border-radius: 4px; }

/* hr */
.markdown-body hr { border: 0; border-top: 1px solid #d0d7de; margin: 1.5em 0; }

/* table */
.markdown-body table { width: 100%; }

/* print adjustments */
@media print {
  .markdown-body { color: #000; }
  a { color: inherit; text-decoration: none; }
}
"#;

/// Theme-specific CSS layered after [`DEFAULT_CSS`].
pub fn theme_css(theme: Theme) -> &'static str {
    match theme {
        Theme::Mpe => MPE_CSS,
        Theme::Github | Theme::Minimal => "",
    }
}

/// Whether the theme links github-markdown-css from the CDN.
pub fn theme_uses_github_css(theme: Theme) -> bool {
    matches!(theme, Theme::Mpe | Theme::Github)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpe_layers_typography_over_github_css() {
        assert!(theme_uses_github_css(Theme::Mpe));
        assert!(theme_css(Theme::Mpe).contains("line-height: 1.8"));
    }

    #[test]
    fn github_theme_has_no_extra_css() {
        assert!(theme_uses_github_css(Theme::Github));
        assert!(theme_css(Theme::Github).is_empty());
    }

    #[test]
    fn minimal_theme_is_base_only() {
        assert!(!theme_uses_github_css(Theme::Minimal));
        assert!(theme_css(Theme::Minimal).is_empty());
    }

    #[test]
    fn default_css_defines_page_break_helper() {
        assert!(DEFAULT_CSS.contains(".page-break"));
    }
}
