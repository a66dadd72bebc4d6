//! Output types: conversion results and run statistics.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of converting a single Markdown document.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The produced PDF bytes.
    pub pdf: Vec<u8>,
    /// The intermediate HTML document handed to the backend.
    pub html: String,
    /// Timing and size statistics for the run.
    pub stats: ConversionStats,
}

/// Timing and size statistics for one conversion.
///
/// Serialisable so the CLI can emit it with `--json` and callers can log or
/// diff two runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Byte length of the Markdown handed to the HTML stage (after cover
    /// assembly and list normalization).
    pub markdown_bytes: usize,
    /// Byte length of the assembled HTML.
    pub html_bytes: usize,
    /// Byte length of the produced PDF.
    pub pdf_bytes: usize,
    /// Name of the backend that produced the PDF ("chromium" / "wkhtmltopdf").
    pub engine: String,
    /// Wall-clock time spent in the backend subprocess.
    pub render_duration_ms: u64,
    /// Wall-clock time for the whole pipeline.
    pub total_duration_ms: u64,
}

/// Per-input outcome of a batch conversion.
///
/// A failed input carries its [`FileError`] instead of aborting the batch;
/// callers decide their own tolerance (abort, log and continue, or collect
/// all errors for a post-run report).
#[derive(Debug, Clone)]
pub struct FileResult {
    /// The input as the caller supplied it (path or URL).
    pub input: String,
    /// Where the PDF was written, when the input succeeded.
    pub output_path: Option<PathBuf>,
    /// Statistics for the input, when it succeeded.
    pub stats: Option<ConversionStats>,
    /// The failure, when the input did not convert.
    pub error: Option<FileError>,
}

impl FileResult {
    /// True when this input produced a PDF.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_roundtrip() {
        let stats = ConversionStats {
            markdown_bytes: 120,
            html_bytes: 4096,
            pdf_bytes: 90_000,
            engine: "chromium".into(),
            render_duration_ms: 830,
            total_duration_ms: 910,
        };
        let json = serde_json::to_string_pretty(&stats).unwrap();
        let back: ConversionStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pdf_bytes, 90_000);
        assert_eq!(back.engine, "chromium");
    }

    #[test]
    fn file_result_ok_predicate() {
        let ok = FileResult {
            input: "a.md".into(),
            output_path: Some(PathBuf::from("a.pdf")),
            stats: Some(ConversionStats::default()),
            error: None,
        };
        assert!(ok.is_ok());

        let failed = FileResult {
            input: "b.md".into(),
            output_path: None,
            stats: None,
            error: Some(FileError::NotFound { input: "b.md".into() }),
        };
        assert!(!failed.is_ok());
    }
}
