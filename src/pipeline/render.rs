//! PDF rendering: drive a headless browser subprocess over the assembled HTML.
//!
//! Two backends are supported. Chromium (and its relatives) runs the page's
//! JavaScript before printing, so highlight.js, Mermaid and math typesetting
//! all take effect. wkhtmltopdf is a lighter fallback with no usable script
//! engine; documents that rely on scripts degrade to plain text there.
//!
//! The HTML is written to a temp file and handed to the backend as a
//! `file://` URL, and the PDF is collected from a temp output path. Both are
//! cleaned up when the temp handles drop.

use crate::config::{ConversionConfig, Engine};
use crate::error::Md2PdfError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Executable names probed on `PATH` for the Chromium family, in preference
/// order.
const CHROMIUM_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "msedge",
    "microsoft-edge",
];

const WKHTMLTOPDF_CANDIDATES: &[&str] = &["wkhtmltopdf"];

/// Page margins as CSS lengths, one per side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Margin {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Margin {
    /// Parse a CSS-shorthand margin string ("20mm", "20mm 15mm",
    /// "1in 2in 3in 4in") into four sides.
    pub fn parse(spec: &str) -> Result<Self, Md2PdfError> {
        let parts: Vec<&str> = spec.split_whitespace().collect();
        if parts.is_empty() {
            return Err(Md2PdfError::InvalidConfig(format!(
                "empty margin specification: {spec:?}"
            )));
        }
        let top = parts[0].to_string();
        let right = parts.get(1).unwrap_or(&parts[0]).to_string();
        let bottom = parts.get(2).unwrap_or(&parts[0]).to_string();
        let left = parts.get(3).map(|s| s.to_string()).unwrap_or_else(|| right.clone());
        Ok(Margin { top, right, bottom, left })
    }
}

/// Build the `@page` rule carrying page size and margins.
pub fn page_rule(page_size: &str, margin: &Margin) -> String {
    format!(
        "@page {{ size: {}; margin: {} {} {} {}; }}",
        page_size, margin.top, margin.right, margin.bottom, margin.left
    )
}

/// A backend binary located on `PATH`.
#[derive(Debug, Clone)]
pub enum ResolvedBackend {
    Chromium(PathBuf),
    Wkhtmltopdf(PathBuf),
}

impl ResolvedBackend {
    /// Short backend name for logs and stats ("chromium" / "wkhtmltopdf").
    pub fn name(&self) -> &'static str {
        match self {
            ResolvedBackend::Chromium(_) => "chromium",
            ResolvedBackend::Wkhtmltopdf(_) => "wkhtmltopdf",
        }
    }

    /// True when the backend executes the page's JavaScript before printing.
    pub fn runs_scripts(&self) -> bool {
        matches!(self, ResolvedBackend::Chromium(_))
    }
}

/// Locate a rendering backend for the requested engine.
///
/// `Engine::Auto` prefers Chromium and falls back to wkhtmltopdf; the
/// explicit variants fail with a hint if their binary is not installed.
pub fn resolve_backend(engine: Engine) -> Result<ResolvedBackend, Md2PdfError> {
    match engine {
        Engine::Auto => {
            if let Some(path) = find_on_path(CHROMIUM_CANDIDATES) {
                return Ok(ResolvedBackend::Chromium(path));
            }
            if let Some(path) = find_on_path(WKHTMLTOPDF_CANDIDATES) {
                return Ok(ResolvedBackend::Wkhtmltopdf(path));
            }
            Err(Md2PdfError::NoBackendAvailable)
        }
        Engine::Chromium => find_on_path(CHROMIUM_CANDIDATES)
            .map(ResolvedBackend::Chromium)
            .ok_or_else(|| Md2PdfError::BackendNotFound {
                engine: "chromium".into(),
                hint: "install Chromium or Google Chrome, or pass --engine auto".into(),
            }),
        Engine::Wkhtmltopdf => find_on_path(WKHTMLTOPDF_CANDIDATES)
            .map(ResolvedBackend::Wkhtmltopdf)
            .ok_or_else(|| Md2PdfError::BackendNotFound {
                engine: "wkhtmltopdf".into(),
                hint: "install wkhtmltopdf, or pass --engine auto".into(),
            }),
    }
}

fn find_on_path(candidates: &[&str]) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        for name in candidates {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                debug!("Found backend binary: {}", candidate.display());
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Render the assembled HTML to PDF bytes with the given backend.
pub async fn render_pdf(
    html: &str,
    config: &ConversionConfig,
    backend: &ResolvedBackend,
) -> Result<Vec<u8>, Md2PdfError> {
    let html_file = tempfile::Builder::new()
        .prefix("md2pdf-")
        .suffix(".html")
        .tempfile()
        .map_err(|e| Md2PdfError::Internal(format!("cannot create temp HTML file: {e}")))?;
    std::fs::write(html_file.path(), html)
        .map_err(|e| Md2PdfError::Internal(format!("cannot write temp HTML file: {e}")))?;

    let out_dir = tempfile::tempdir()
        .map_err(|e| Md2PdfError::Internal(format!("cannot create temp output dir: {e}")))?;
    let pdf_path = out_dir.path().join("out.pdf");

    let margin = Margin::parse(&config.margin)?;
    let mut cmd = match backend {
        ResolvedBackend::Chromium(bin) => {
            chromium_command(bin, html_file.path(), &pdf_path)
        }
        ResolvedBackend::Wkhtmltopdf(bin) => {
            wkhtmltopdf_command(bin, html_file.path(), &pdf_path, config, &margin)
        }
    };

    info!("Rendering PDF with {}", backend.name());
    let timeout = Duration::from_secs(config.render_timeout_secs);
    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| Md2PdfError::RenderFailed {
            engine: backend.name().into(),
            detail: format!("timed out after {}s", config.render_timeout_secs),
        })?
        .map_err(|e| Md2PdfError::RenderFailed {
            engine: backend.name().into(),
            detail: format!("failed to spawn: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(Md2PdfError::RenderFailed {
            engine: backend.name().into(),
            detail: format!("exit status {}: {}", output.status, detail),
        });
    }

    let pdf = std::fs::read(&pdf_path).map_err(|_| Md2PdfError::EmptyRender {
        engine: backend.name().into(),
        path: pdf_path.clone(),
    })?;
    if pdf.is_empty() {
        return Err(Md2PdfError::EmptyRender {
            engine: backend.name().into(),
            path: pdf_path,
        });
    }

    debug!("Backend produced {} bytes of PDF", pdf.len());
    Ok(pdf)
}

fn chromium_command(bin: &Path, html_path: &Path, pdf_path: &Path) -> Command {
    let mut cmd = Command::new(bin);
    cmd.arg("--headless")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--allow-file-access-from-files")
        .arg("--no-pdf-header-footer")
        // Give the page's scripts (Mermaid, MathJax) time to settle before
        // printing. Virtual time runs faster than wall-clock when idle.
        .arg("--virtual-time-budget=10000")
        .arg(format!("--print-to-pdf={}", pdf_path.display()))
        .arg(path_to_file_url(html_path));
    cmd.kill_on_drop(true);
    cmd
}

fn wkhtmltopdf_command(
    bin: &Path,
    html_path: &Path,
    pdf_path: &Path,
    config: &ConversionConfig,
    margin: &Margin,
) -> Command {
    let mut cmd = Command::new(bin);
    cmd.arg("--quiet")
        .arg("--enable-local-file-access")
        .arg("--page-size")
        .arg(&config.page_size)
        .arg("--margin-top")
        .arg(&margin.top)
        .arg("--margin-right")
        .arg(&margin.right)
        .arg("--margin-bottom")
        .arg(&margin.bottom)
        .arg("--margin-left")
        .arg(&margin.left)
        .arg(html_path)
        .arg(pdf_path);
    cmd.kill_on_drop(true);
    cmd
}

/// Convert an absolute path to a `file://` URL the backend accepts.
///
/// ASCII characters that commonly break URL parsing and all non-ASCII bytes
/// (the raw UTF-8 bytes of the path) are percent-encoded; forward slashes
/// are kept as path separators.
pub fn path_to_file_url(path: &Path) -> String {
    use std::fmt::Write;

    let raw = path.to_string_lossy();
    let mut url = String::with_capacity(raw.len() + 8);
    url.push_str("file://");
    for byte in raw.bytes() {
        match byte {
            b' ' => url.push_str("%20"),
            b'#' => url.push_str("%23"),
            b'?' => url.push_str("%3F"),
            b'%' => url.push_str("%25"),
            0x80.. => {
                let _ = write!(url, "%{byte:02X}");
            }
            _ => url.push(byte as char),
        }
    }
    url
}
