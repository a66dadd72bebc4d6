//! Conversion orchestration: the top-level pipeline and batch driver.
//!
//! [`convert`] runs the full pipeline for one input and returns the PDF in
//! memory; [`convert_to_file`] additionally writes it to disk atomically;
//! [`convert_many`] fans a batch out over a bounded number of concurrent
//! conversions and reports per-input results. [`convert_sync`] wraps
//! [`convert`] for callers without a Tokio runtime.

use crate::config::{ConversionConfig, MathEngine};
use crate::error::{FileError, Md2PdfError};
use crate::output::{ConversionOutput, ConversionStats, FileResult};
use crate::pipeline::{embed, html, input, normalize, render};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Separator inserted between the cover document and the main content.
const PAGE_BREAK_DIV: &str = "<div class=\"page-break\"></div>";

/// Convert a single Markdown input (local path or HTTP/HTTPS URL) to PDF.
///
/// Returns the PDF bytes together with the intermediate HTML and run
/// statistics. The output PDF is not written anywhere; see
/// [`convert_to_file`] for that.
pub async fn convert(
    input_str: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let total_start = Instant::now();

    if input_str.trim().is_empty() {
        return Err(Md2PdfError::InvalidInput {
            input: input_str.to_string(),
        });
    }

    // ── Step 1: Resolve input to a local file ────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let markdown_path = resolved.path().to_path_buf();

    // ── Step 2: Read the Markdown source ─────────────────────────────────
    let content = tokio::fs::read_to_string(&markdown_path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Md2PdfError::FileNotFound {
                path: markdown_path.clone(),
            },
            std::io::ErrorKind::PermissionDenied => Md2PdfError::PermissionDenied {
                path: markdown_path.clone(),
            },
            _ => Md2PdfError::Internal(format!(
                "cannot read '{}': {e}",
                markdown_path.display()
            )),
        })?;

    // ── Step 3: Prepend the cover, if configured ─────────────────────────
    let markdown = match &config.cover {
        Some(cover_path) => {
            let cover = tokio::fs::read_to_string(cover_path).await.map_err(|_| {
                Md2PdfError::CoverNotFound {
                    path: cover_path.clone(),
                }
            })?;
            format!("{cover}\n\n{PAGE_BREAK_DIV}\n\n{content}")
        }
        None => content,
    };

    // ── Step 4: Normalize list structure ─────────────────────────────────
    let markdown = normalize::normalize_lists(&markdown);

    // ── Step 5: Load user CSS and compute page geometry ──────────────────
    let user_css = match &config.css {
        Some(css_path) => tokio::fs::read_to_string(css_path).await.map_err(|_| {
            Md2PdfError::CssNotFound {
                path: css_path.clone(),
            }
        })?,
        None => String::new(),
    };
    let margin = render::Margin::parse(&config.margin)?;
    let page_css = render::page_rule(&config.page_size, &margin);

    // ── Step 6: Assemble the HTML document ───────────────────────────────
    let base_url = effective_base_url(config, &resolved);
    let html_doc = html::build_document(
        &markdown,
        config,
        base_url.as_deref(),
        &user_css,
        &page_css,
    );

    // ── Step 7: Optionally inline local images ───────────────────────────
    let html_doc = if config.embed_images {
        let base_dir = markdown_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        embed::embed_local_images(&html_doc, &base_dir)
    } else {
        html_doc
    };

    // ── Step 8: Locate the rendering backend ─────────────────────────────
    let backend = render::resolve_backend(config.engine)?;
    if !backend.runs_scripts() && (config.math != MathEngine::None || config.mermaid) {
        warn!(
            "Backend '{}' does not execute JavaScript; math and Mermaid \
             blocks will not render",
            backend.name()
        );
    }

    // ── Step 9: Render the PDF ───────────────────────────────────────────
    let render_start = Instant::now();
    let pdf = render::render_pdf(&html_doc, config, &backend).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    let stats = ConversionStats {
        markdown_bytes: markdown.len(),
        html_bytes: html_doc.len(),
        pdf_bytes: pdf.len(),
        engine: backend.name().to_string(),
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Converted '{}' in {}ms ({} bytes of PDF via {})",
        input_str, stats.total_duration_ms, stats.pdf_bytes, stats.engine
    );

    Ok(ConversionOutput {
        pdf,
        html: html_doc,
        stats,
    })
}

/// Convert a single input and write the PDF to `output_path`.
///
/// The write is atomic: the PDF lands in a temporary sibling file that is
/// renamed into place, so a crash never leaves a truncated PDF behind. With
/// `debug_html` enabled, the intermediate HTML is written next to the PDF
/// with an `.html` extension.
pub async fn convert_to_file(
    input_str: &str,
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionStats, Md2PdfError> {
    let output = convert(input_str, config).await?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Md2PdfError::OutputWriteFailed {
                    path: output_path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = output_path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &output.pdf)
        .await
        .map_err(|e| Md2PdfError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, output_path).await.map_err(|e| {
        Md2PdfError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        }
    })?;

    if config.debug_html {
        let html_path = output_path.with_extension("html");
        tokio::fs::write(&html_path, &output.html)
            .await
            .map_err(|e| Md2PdfError::OutputWriteFailed {
                path: html_path,
                source: e,
            })?;
        debug!("Wrote intermediate HTML next to the PDF");
    }

    info!("Wrote '{}'", output_path.display());
    Ok(output.stats)
}

/// Blocking wrapper around [`convert`] for callers without a Tokio runtime.
pub fn convert_sync(
    input_str: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Md2PdfError::Internal(format!("cannot create Tokio runtime: {e}")))?;
    runtime.block_on(convert(input_str, config))
}

/// Convert a batch of inputs, each to its default output path.
///
/// Inputs are processed with bounded concurrency (`config.concurrency`).
/// A missing or failing input produces a [`FileResult`] carrying its
/// [`FileError`] instead of aborting the batch; the call only fails with
/// [`Md2PdfError::AllInputsFailed`] when not a single input succeeded.
/// Results come back in input order.
pub async fn convert_many(
    inputs: &[String],
    config: &ConversionConfig,
) -> Result<Vec<FileResult>, Md2PdfError> {
    let total = inputs.len();
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results: Vec<(usize, FileResult)> = stream::iter(inputs.iter().enumerate())
        .map(|(idx, input_str)| async move {
            (idx, convert_one(input_str, total, config).await)
        })
        .buffer_unordered(config.concurrency)
        .collect()
        .await;
    results.sort_by_key(|(idx, _)| *idx);
    let results: Vec<FileResult> = results.into_iter().map(|(_, r)| r).collect();

    let success_count = results.iter().filter(|r| r.is_ok()).count();
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_complete(total, success_count);
    }

    if success_count == 0 && total > 0 {
        let first_error = results
            .iter()
            .find_map(|r| r.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(Md2PdfError::AllInputsFailed { total, first_error });
    }

    Ok(results)
}

/// Run one batch input end to end, folding every failure into a [`FileError`].
async fn convert_one(input_str: &str, total: usize, config: &ConversionConfig) -> FileResult {
    if let Some(cb) = &config.progress_callback {
        cb.on_file_start(input_str, total);
    }

    // Missing local files are reported without running the pipeline so a
    // typo'd path doesn't cost a backend launch.
    if !input::is_url(input_str) && !Path::new(input_str).exists() {
        warn!("Input not found, skipping: {}", input_str);
        let error = FileError::NotFound {
            input: input_str.to_string(),
        };
        if let Some(cb) = &config.progress_callback {
            cb.on_file_error(input_str, total, error.to_string());
        }
        return FileResult {
            input: input_str.to_string(),
            output_path: None,
            stats: None,
            error: Some(error),
        };
    }

    let output_path = default_output_path(input_str);
    match convert_to_file(input_str, &output_path, config).await {
        Ok(stats) => {
            if let Some(cb) = &config.progress_callback {
                cb.on_file_complete(input_str, total, stats.pdf_bytes);
            }
            FileResult {
                input: input_str.to_string(),
                output_path: Some(output_path),
                stats: Some(stats),
                error: None,
            }
        }
        Err(e) => {
            warn!("Conversion failed for '{}': {}", input_str, e);
            let error = FileError::Failed {
                input: input_str.to_string(),
                detail: e.to_string(),
            };
            if let Some(cb) = &config.progress_callback {
                cb.on_file_error(input_str, total, error.to_string());
            }
            FileResult {
                input: input_str.to_string(),
                output_path: None,
                stats: None,
                error: Some(error),
            }
        }
    }
}

/// Default output path for an input: the input's file name with a `.pdf`
/// extension. Local inputs stay next to their source; URL inputs land in the
/// current directory.
pub fn default_output_path(input_str: &str) -> PathBuf {
    if input::is_url(input_str) {
        let name = input_str
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("output");
        return PathBuf::from(name).with_extension("pdf");
    }
    PathBuf::from(input_str).with_extension("pdf")
}

/// The base URL the document is resolved against: an explicit override wins,
/// otherwise a local input's parent directory. Downloaded inputs get none,
/// their temp directory contains nothing referencable.
fn effective_base_url(
    config: &ConversionConfig,
    resolved: &input::ResolvedInput,
) -> Option<String> {
    if let Some(base) = &config.base_url {
        return Some(base.clone());
    }
    if resolved.is_downloaded() {
        return None;
    }
    let parent = resolved.path().parent()?;
    let absolute = if parent.as_os_str().is_empty() {
        std::env::current_dir().ok()?
    } else if parent.is_absolute() {
        parent.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(parent)
    };
    Some(format!("{}/", render::path_to_file_url(&absolute)))
}
