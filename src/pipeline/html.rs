//! HTML assembly: Markdown body conversion plus the full document template.
//!
//! The Markdown body is converted by comrak with the GFM-style extensions
//! readers expect from a document tool (tables, task lists, footnotes,
//! strikethrough, autolinks). Raw HTML is allowed through because the cover
//! separator and user documents rely on `<div class="page-break">`.
//!
//! The template layers, in order: base stylesheet, theme CSS, user CSS, and
//! the `@page` geometry rule, then the script tags for highlight.js and the
//! optional Mermaid / MathJax / KaTeX runtimes. Script-driven features only
//! take effect on a JavaScript-capable backend.

use crate::config::{ConversionConfig, MathEngine};
use crate::theme;
use comrak::{markdown_to_html, Options};
use std::fmt::Write;

/// Initialisation snippet that re-typesets MathJax once the page has loaded.
const MATHJAX_INIT: &str = r#"<script>
window.addEventListener('load', function(){
  if (window.MathJax && MathJax.typesetPromise) { MathJax.typesetPromise(); }
});
</script>"#;

/// Initialisation snippet for KaTeX auto-render with the usual delimiters.
const KATEX_INIT: &str = r#"<script>
window.addEventListener('load', function(){
  if (window.renderMathInElement) {
    renderMathInElement(document.body, {
      delimiters: [
        {left: '$$', right: '$$', display: true},
        {left: '$', right: '$', display: false},
        {left: '\\(', right: '\\)', display: false},
        {left: '\\[', right: '\\]', display: true}
      ]
    });
  }
});
</script>"#;

/// Rewrites `pre > code.language-mermaid` blocks into `div.mermaid` elements
/// and kicks off Mermaid rendering.
const MERMAID_INIT: &str = r#"<script>
function transformMermaidBlocks(){
  const blocks = Array.from(document.querySelectorAll('pre > code.language-mermaid'));
  for (const code of blocks) {
    const pre = code.parentElement;
    const div = document.createElement('div');
    div.className = 'mermaid';
    div.textContent = code.textContent;
    pre.replaceWith(div);
  }
}
window.addEventListener('load', function(){
  transformMermaidBlocks();
  if (window.mermaid) { mermaid.initialize({startOnLoad: true}); }
});
</script>"#;

/// Convert normalized Markdown into an HTML body fragment.
pub fn markdown_body(markdown: &str) -> String {
    markdown_to_html(markdown, &comrak_options())
}

fn comrak_options() -> Options {
    let mut options = Options::default();

    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.extension.superscript = true;

    // Raw HTML must survive: the cover page-break div and any inline HTML
    // in user documents.
    options.render.unsafe_ = true;

    options
}

/// Assemble the complete HTML document around the converted body.
///
/// `user_css` is the content of the caller's extra stylesheet (may be empty)
/// and `page_css` is the `@page` geometry rule computed from the configured
/// page size and margins.
pub fn build_document(
    markdown: &str,
    config: &ConversionConfig,
    base_url: Option<&str>,
    user_css: &str,
    page_css: &str,
) -> String {
    let body = markdown_body(markdown);
    let title = escape_html(&config.title);

    let mut head = String::with_capacity(2048);
    let mut scripts = String::with_capacity(2048);

    if let Some(base) = base_url {
        let _ = write!(head, "<base href=\"{}\">\n    ", escape_html(base));
    }
    let _ = write!(
        head,
        "<link rel=\"stylesheet\" href=\"{}\">",
        theme::HIGHLIGHT_CSS_HREF
    );
    if theme::theme_uses_github_css(config.theme) {
        let _ = write!(
            head,
            "\n    <link rel=\"stylesheet\" href=\"{}\">",
            theme::GITHUB_MARKDOWN_CSS_HREF
        );
    }

    let _ = write!(
        scripts,
        "<script src=\"{}\"></script>\n    <script>try{{hljs.highlightAll();}}catch(e){{}};</script>",
        theme::HIGHLIGHT_JS_SRC
    );
    if config.mermaid {
        let _ = write!(
            scripts,
            "\n    <script src=\"{}\"></script>\n    {}",
            theme::MERMAID_JS_SRC,
            MERMAID_INIT
        );
    }
    match config.math {
        MathEngine::None => {}
        MathEngine::MathJax => {
            let _ = write!(
                scripts,
                "\n    <script src=\"{}\"></script>\n    {}",
                theme::MATHJAX_JS_SRC,
                MATHJAX_INIT
            );
        }
        MathEngine::Katex => {
            let _ = write!(
                scripts,
                "\n    <link rel=\"stylesheet\" href=\"{}\">\n    <script src=\"{}\"></script>\n    <script src=\"{}\"></script>\n    {}",
                theme::KATEX_CSS_HREF,
                theme::KATEX_JS_SRC,
                theme::KATEX_AUTO_JS_SRC,
                KATEX_INIT
            );
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    {head}
    <style>
{default_css}
{theme_css}
{user_css}
{page_css}
    </style>
  </head>
  <body>
    <main class="markdown-body">{body}</main>
    {scripts}
  </body>
</html>
"#,
        title = title,
        head = head,
        default_css = theme::DEFAULT_CSS,
        theme_css = theme::theme_css(config.theme),
        user_css = user_css,
        page_css = page_css,
        body = body,
        scripts = scripts,
    )
}

/// Minimal HTML escaping for attribute and title text.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConversionConfig, MathEngine, Theme};

    fn config() -> ConversionConfig {
        ConversionConfig::default()
    }

    #[test]
    fn body_renders_gfm_table() {
        let html = markdown_body("| A | B |\n| --- | --- |\n| 1 | 2 |");
        assert!(html.contains("<table>"), "got: {html}");
    }

    #[test]
    fn body_renders_task_list() {
        let html = markdown_body("- [x] done\n- [ ] open");
        assert!(html.contains("type=\"checkbox\""), "got: {html}");
    }

    #[test]
    fn body_passes_raw_html_through() {
        let html = markdown_body("before\n\n<div class=\"page-break\"></div>\n\nafter");
        assert!(html.contains("<div class=\"page-break\"></div>"));
    }

    #[test]
    fn document_contains_title_and_body() {
        let doc = build_document("# Heading", &config(), None, "", "");
        assert!(doc.contains("<title>Document</title>"));
        assert!(doc.contains("<h1>Heading</h1>"));
        assert!(doc.contains("markdown-body"));
    }

    #[test]
    fn title_is_escaped() {
        let mut cfg = config();
        cfg.title = "<Quarterly> & \"Annual\"".into();
        let doc = build_document("text", &cfg, None, "", "");
        assert!(doc.contains("&lt;Quarterly&gt; &amp; &quot;Annual&quot;"));
        assert!(!doc.contains("<Quarterly>"));
    }

    #[test]
    fn base_tag_present_only_when_given() {
        let with = build_document("x", &config(), Some("file:///tmp/docs/"), "", "");
        assert!(with.contains("<base href=\"file:///tmp/docs/\">"));

        let without = build_document("x", &config(), None, "", "");
        assert!(!without.contains("<base"));
    }

    #[test]
    fn mathjax_injected_by_default() {
        let doc = build_document("$x$", &config(), None, "", "");
        assert!(doc.contains("mathjax"));
        assert!(doc.contains("MathJax.typesetPromise"));
    }

    #[test]
    fn katex_replaces_mathjax_when_selected() {
        let mut cfg = config();
        cfg.math = MathEngine::Katex;
        let doc = build_document("$x$", &cfg, None, "", "");
        assert!(doc.contains("katex"));
        assert!(doc.contains("renderMathInElement"));
        assert!(!doc.contains("mathjax"));
    }

    #[test]
    fn math_none_injects_no_math_scripts() {
        let mut cfg = config();
        cfg.math = MathEngine::None;
        let doc = build_document("$x$", &cfg, None, "", "");
        assert!(!doc.contains("mathjax"));
        assert!(!doc.contains("katex"));
    }

    #[test]
    fn mermaid_can_be_disabled() {
        let mut cfg = config();
        cfg.mermaid = false;
        let doc = build_document("```mermaid\ngraph TD;\n```", &cfg, None, "", "");
        assert!(!doc.contains("mermaid.min.js"));
    }

    #[test]
    fn minimal_theme_skips_github_css() {
        let mut cfg = config();
        cfg.theme = Theme::Minimal;
        let doc = build_document("x", &cfg, None, "", "");
        assert!(!doc.contains("github-markdown"));
    }

    #[test]
    fn user_and_page_css_land_in_style_block() {
        let doc = build_document(
            "x",
            &config(),
            None,
            "h1 { color: red; }",
            "@page { size: A4; margin: 20mm 20mm 20mm 20mm; }",
        );
        assert!(doc.contains("h1 { color: red; }"));
        assert!(doc.contains("@page { size: A4;"));
    }
}
