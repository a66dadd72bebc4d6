//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! ## Why download to a temp file?
//!
//! The rest of the pipeline wants a file-system path: the `<base href>` of
//! the generated HTML is derived from the input's parent directory so that
//! relative image links resolve. Downloading to a `TempDir` gives us such a
//! path while ensuring cleanup happens automatically when `ResolvedInput` is
//! dropped, even if the process panics.

use crate::error::Md2PdfError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; document downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the Markdown file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }

    /// True when the input came from a URL download.
    ///
    /// Downloaded inputs get no default `<base href>` — their temp directory
    /// contains nothing the document could reference.
    pub fn is_downloaded(&self) -> bool {
        matches!(self, ResolvedInput::Downloaded { .. })
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local Markdown file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, Md2PdfError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Resolve a local file path, validating existence and readability.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, Md2PdfError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(Md2PdfError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Md2PdfError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Md2PdfError::FileNotFound { path });
        }
    }

    debug!("Resolved local Markdown file: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, Md2PdfError> {
    info!("Downloading Markdown from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Md2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Md2PdfError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Md2PdfError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Md2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = extract_filename(url);

    let temp_dir = TempDir::new().map_err(|e| Md2PdfError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Md2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| Md2PdfError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.md".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/notes.md"));
        assert!(is_url("http://example.com/notes.md"));
        assert!(!is_url("/tmp/notes.md"));
        assert!(!is_url("notes.md"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("https://example.com/a/readme.md"), "readme.md");
        assert_eq!(extract_filename("https://example.com/"), "downloaded.md");
        assert_eq!(extract_filename("https://example.com/nodot"), "downloaded.md");
    }

    #[tokio::test]
    async fn test_resolve_local_missing_file() {
        let err = resolve_input("/definitely/not/a/real/file.md", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Md2PdfError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_local_existing_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "# hello").unwrap();

        let resolved = resolve_input(tmp.path().to_str().unwrap(), 5).await.unwrap();
        assert!(!resolved.is_downloaded());
        assert_eq!(resolved.path(), tmp.path());
    }
}
