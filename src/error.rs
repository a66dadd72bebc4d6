//! Error types for the md2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2PdfError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing input, no PDF backend installed, backend crashed). Returned as
//!   `Err(Md2PdfError)` from the top-level `convert*` functions.
//!
//! * [`FileError`] — **Non-fatal**: a single input file in a batch failed
//!   (file missing, render error) but the other inputs are fine. Stored inside
//!   [`crate::output::FileResult`] so callers can inspect partial success
//!   rather than losing the whole batch to one bad file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2pdf library.
///
/// Per-input failures in batch mode use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input Markdown file was not found at the given path.
    #[error("Markdown file not found: '{}'\nCheck the path exists and is readable.", path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r '{}'", path.display(), path.display())]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The extra CSS file named in the configuration does not exist.
    #[error("CSS file not found: '{}'", path.display())]
    CssNotFound { path: PathBuf },

    /// The cover Markdown file named in the configuration does not exist.
    #[error("Cover file not found: '{}'", path.display())]
    CoverNotFound { path: PathBuf },

    // ── Backend errors ────────────────────────────────────────────────────
    /// No PDF backend binary could be located on PATH.
    #[error(
        "No PDF backend available.\n\
Install a Chromium-family browser (chromium, google-chrome, msedge) or\n\
wkhtmltopdf, or point --engine at one that is already installed."
    )]
    NoBackendAvailable,

    /// The explicitly requested backend is not installed.
    #[error("PDF backend '{engine}' not found on PATH.\n{hint}")]
    BackendNotFound { engine: String, hint: String },

    /// The backend subprocess failed to start or exited with an error.
    #[error("PDF rendering failed ({engine}): {detail}")]
    RenderFailed { engine: String, detail: String },

    /// The backend exited successfully but produced no PDF file.
    #[error("PDF backend '{engine}' produced no output at '{}'", path.display())]
    EmptyRender { engine: String, path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Batch errors ──────────────────────────────────────────────────────
    /// Every input in a batch failed; no PDF was produced.
    #[error("All {total} inputs failed.\nFirst error: {first_error}")]
    AllInputsFailed { total: usize, first_error: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input in a batch conversion.
///
/// Stored alongside [`crate::output::FileResult`] when one input fails.
/// The overall batch continues unless ALL inputs fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The input file does not exist; the batch skips it.
    #[error("'{input}': file not found, skipping")]
    NotFound { input: String },

    /// Conversion of this input failed after the pipeline ran.
    #[error("'{input}': conversion failed: {detail}")]
    Failed { input: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_not_found_display() {
        let e = Md2PdfError::BackendNotFound {
            engine: "wkhtmltopdf".into(),
            hint: "Install via your package manager.".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("wkhtmltopdf"), "got: {msg}");
    }

    #[test]
    fn all_inputs_failed_display() {
        let e = Md2PdfError::AllInputsFailed {
            total: 3,
            first_error: "boom".into(),
        };
        assert!(e.to_string().contains("All 3 inputs failed"));
        assert!(e.to_string().contains("boom"));
    }

    #[test]
    fn file_error_roundtrips_through_json() {
        let e = FileError::Failed {
            input: "a.md".into(),
            detail: "render crashed".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: FileError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), e.to_string());
    }
}
