//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ html ──▶ embed ──▶ render
//! (URL/path)  (lists)    (comrak)  (data:)   (subprocess)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local file
//! 2. [`normalize`] — single-pass list-normalization text filter; the only
//!    stage with its own state machine
//! 3. [`html`]      — Markdown → HTML body via comrak, wrapped in the full
//!    document template (theme CSS, math/mermaid scripts, base tag)
//! 4. [`embed`]     — optionally inline local images as base64 `data:` URIs
//! 5. [`render`]    — drive the backend subprocess that exports the PDF; the
//!    only stage that spawns processes

pub mod embed;
pub mod html;
pub mod input;
pub mod normalize;
pub mod render;
