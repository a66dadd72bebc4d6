//! Image embedding: inline local images as base64 `data:` URIs.
//!
//! Useful when the PDF must be reproducible on a machine that does not have
//! the source tree, or when the backend's file-access sandbox blocks relative
//! image paths. Remote (`http`/`https`) and already-inlined (`data:`) sources
//! are left untouched.

use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;
use tracing::debug;

static RE_IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<img\b[^>]*?\bsrc=")([^"]+)(")"#).unwrap());

/// Rewrite `<img src="...">` references to local files into `data:` URIs.
///
/// `base_dir` is the directory relative sources are resolved against, which
/// is the parent directory of the source Markdown file. Sources that cannot
/// be read are left as-is so the backend can still attempt them.
pub fn embed_local_images(html: &str, base_dir: &Path) -> String {
    RE_IMG_SRC
        .replace_all(html, |caps: &Captures| {
            let prefix = &caps[1];
            let src = &caps[2];
            let suffix = &caps[3];

            if src.starts_with("http://")
                || src.starts_with("https://")
                || src.starts_with("data:")
            {
                return caps[0].to_string();
            }

            let path = resolve_src(src, base_dir);
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let mime = mime_for_path(&path);
                    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
                    debug!("Embedded image: {} ({} bytes base64)", src, encoded.len());
                    format!("{prefix}data:{mime};base64,{encoded}{suffix}")
                }
                Err(e) => {
                    debug!("Leaving image unembedded, cannot read {}: {}", src, e);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

fn resolve_src(src: &str, base_dir: &Path) -> std::path::PathBuf {
    let candidate = Path::new(src);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Shortest valid PNG signature prefix, enough for encoding tests.
    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn embeds_relative_local_image() {
        let dir = tempfile::tempdir().unwrap();
        let img_path = dir.path().join("logo.png");
        std::fs::File::create(&img_path)
            .unwrap()
            .write_all(PNG_BYTES)
            .unwrap();

        let html = r#"<p><img src="logo.png" alt="logo"></p>"#;
        let out = embed_local_images(html, dir.path());

        assert!(out.contains("data:image/png;base64,"), "got: {out}");
        assert!(!out.contains("src=\"logo.png\""));
        assert!(out.contains("alt=\"logo\""));
    }

    #[test]
    fn leaves_remote_and_data_sources_alone() {
        let dir = tempfile::tempdir().unwrap();
        let html = concat!(
            r#"<img src="https://example.com/a.png">"#,
            r#"<img src="http://example.com/b.png">"#,
            r#"<img src="data:image/png;base64,AAAA">"#,
        );
        assert_eq!(embed_local_images(html, dir.path()), html);
    }

    #[test]
    fn unreadable_image_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let html = r#"<img src="missing.png">"#;
        assert_eq!(embed_local_images(html, dir.path()), html);
    }

    #[test]
    fn mime_detection_by_extension() {
        assert_eq!(mime_for_path(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }
}
