//! List normalization: rewrite raw Markdown so list markers parse correctly.
//!
//! ## Why is normalization necessary?
//!
//! A lot of real-world Markdown — hand-written notes, LLM output, exported
//! wiki pages — runs list items directly against the preceding paragraph or
//! indents sub-bullets by a single space. CommonMark parsers then read those
//! lines as lazy paragraph continuations instead of list items, and the
//! rendered PDF shows a wall of text where the author meant a list.
//!
//! This module applies a single top-to-bottom pass over the document with one
//! line of look-back (the previously emitted line) and a two-state fence
//! machine ([`FenceState`]). Outside fenced code blocks it:
//!
//! 1. inserts a blank separator line before a list start that follows
//!    non-list content,
//! 2. re-indents shallow sub-bullets under a numbered item to 6 spaces so
//!    they nest instead of becoming top-level siblings,
//! 3. canonicalizes top-level `*` bullets to `-`.
//!
//! Inside a fence every line passes through untouched. The transform is total:
//! it cannot fail, never removes or reorders lines, and degrades gracefully on
//! malformed input (an unterminated fence simply passes the rest of the
//! document through unchanged).

use once_cell::sync::Lazy;
use regex::Regex;

// ── Line classification ──────────────────────────────────────────────────────

/// Fence delimiter: optional leading whitespace, then three backticks.
static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```").unwrap());

/// Nested bullet: two-or-more-space indent, then `*`/`+`/`-` and whitespace.
static RE_NESTED_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{2,}[*+-]\s+").unwrap());

/// Nested numbered item: two-or-more-space indent, digits, `.` or `)`, whitespace.
static RE_NESTED_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{2,}\d+[.)]\s+").unwrap());

/// Top-level bullet: `*`/`+`/`-` at column 0, then whitespace.
static RE_TOP_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*+-]\s+").unwrap());

/// Top-level numbered item: digits at column 0, `.` or `)`, whitespace.
static RE_TOP_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s+").unwrap());

/// Leading whitespace run (for the re-indent rewrite).
static RE_LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());

/// Top-level `*` marker plus the whitespace that follows it.
static RE_TOP_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\s+").unwrap());

// ── Fence state machine ──────────────────────────────────────────────────────

/// Whether the pass is currently inside a fenced code block.
///
/// Every fence-delimiter line toggles the state; no language tags or fence
/// indentation are tracked. An odd number of fence lines leaves the machine
/// in [`FenceState::InFence`] at end of input, which is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Normal,
    InFence,
}

impl FenceState {
    fn toggled(self) -> Self {
        match self {
            FenceState::Normal => FenceState::InFence,
            FenceState::InFence => FenceState::Normal,
        }
    }
}

// ── Normalization pass ───────────────────────────────────────────────────────

/// Normalize list markers in a Markdown document.
///
/// Pure text transformation: lines are split on `\n` (a trailing `\r` from
/// CRLF input is stripped), rewritten per the rules below, and rejoined with
/// `\n`. Relative line order is preserved and the line count never decreases
/// — only blank separator lines are inserted.
///
/// Rules (outside fenced code blocks):
/// 1. A fence-delimiter line toggles fence state and is emitted unchanged.
/// 2. A blank line is inserted before any list-start line (nested or
///    top-level, bullet or numbered) whose predecessor is non-blank and is
///    not itself a nested item or a top-level bullet. A top-level *numbered*
///    predecessor does not suppress the insertion.
/// 3. A nested bullet directly following a top-level numbered line is
///    re-indented to exactly 6 spaces when its indent is shallower than 6.
/// 4. A top-level `*` bullet marker is rewritten to `-`.
/// 5. Top-level numbered lines pass through unchanged.
pub fn normalize_lists(input: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut state = FenceState::Normal;
    let mut prev = String::new();

    for raw in input.lines() {
        if RE_FENCE.is_match(raw) {
            state = state.toggled();
            out.push(raw.to_string());
            prev = raw.to_string();
            continue;
        }

        let in_fence = state == FenceState::InFence;
        let is_nested = !in_fence
            && (RE_NESTED_BULLET.is_match(raw) || RE_NESTED_NUMBERED.is_match(raw));
        let is_top_bullet = !in_fence && RE_TOP_BULLET.is_match(raw);
        let is_top_numbered = !in_fence && RE_TOP_NUMBERED.is_match(raw);

        let needs_blank = (is_nested || is_top_bullet || is_top_numbered)
            && !prev.trim().is_empty()
            && !RE_NESTED_BULLET.is_match(&prev)
            && !RE_NESTED_NUMBERED.is_match(&prev)
            && !RE_TOP_BULLET.is_match(&prev);
        if needs_blank {
            out.push(String::new());
        }

        let mut line = raw.to_string();

        // Re-indent repair: a shallow sub-bullet right after "1. item" would
        // otherwise break out of the numbered list.
        if !in_fence && RE_NESTED_BULLET.is_match(&line) && RE_TOP_NUMBERED.is_match(&prev) {
            let leading = RE_LEADING_WS.find(&line).map_or(0, |m| m.end());
            if leading < 6 {
                line = RE_LEADING_WS.replace(&line, "      ").into_owned();
            }
        }

        // Marker canonicalization applies to top-level `*` bullets only.
        if !in_fence && RE_TOP_BULLET.is_match(&line) {
            line = RE_TOP_STAR.replace(&line, "- ").into_owned();
        }

        out.push(line.clone());
        prev = line;
    }

    out.join("\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────
