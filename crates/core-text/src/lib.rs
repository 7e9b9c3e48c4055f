//! Line records for the outline document.
//!
//! A document is a flat, ordered sequence of `Line`s. The tree is never
//! materialized as linked nodes: structure is implied by each line's
//! `indent` and recomputed on demand by the region resolver in `core-state`.
//!
//! A `Line` stores its literal text exactly as it appeared in the source,
//! leading whitespace included. `indent` is the raw count of those leading
//! whitespace characters (not divided by any unit), so a line indented with
//! three spaces has indent 3. Serialization therefore never has to re-add
//! indentation.
//!
//! Identity:
//! * Every line receives a process-unique `LineId` at construction. Ids are
//!   never reused, so a stale id held by a caller resolves to "unknown line"
//!   rather than silently aliasing a newer line.
//! * Re-parsing a line's text (indent/dedent/merge/save) produces a *new*
//!   line with a fresh id; fold and visibility flags do not survive.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

pub mod codec;

pub use codec::{
    COMMENT_SENTINEL, LineEnding, NormalizedText, TextCodec, leading_indent,
    normalize_line_endings, parse, serialize,
};

static NEXT_LINE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, stable handle for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    /// Allocate the next unused id.
    pub fn next() -> Self {
        Self(NEXT_LINE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Reasons a piece of text cannot become a single `Line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line text contains a line break")]
    EmbeddedNewline,
    #[error("line text is empty or whitespace-only")]
    Blank,
}

/// One unit of text with its indent depth and fold/visibility flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    id: LineId,
    text: String,
    indent: usize,
    comment: bool,
    /// Set on the root of a fold; its region is hidden.
    pub folded: bool,
    /// Hidden by a fold somewhere above this line.
    pub hidden: bool,
}

impl Line {
    /// Build a line using the default comment sentinel (`::`).
    pub fn new(text: impl Into<String>) -> Result<Self, LineError> {
        Self::with_sentinel(text, COMMENT_SENTINEL)
    }

    /// Build a line, detecting comments with a caller supplied sentinel.
    pub fn with_sentinel(text: impl Into<String>, sentinel: &str) -> Result<Self, LineError> {
        let text = text.into();
        if text.contains(['\n', '\r']) {
            return Err(LineError::EmbeddedNewline);
        }
        if text.trim().is_empty() {
            return Err(LineError::Blank);
        }
        Ok(Self::from_checked(text, sentinel))
    }

    // Caller guarantees: single line, not blank.
    pub(crate) fn from_checked(text: String, sentinel: &str) -> Self {
        let indent = leading_indent(&text);
        let comment = !sentinel.is_empty() && text.trim_start().starts_with(sentinel);
        Self {
            id: LineId::next(),
            text,
            indent,
            comment,
            folded: false,
            hidden: false,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    /// Literal text, leading whitespace included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text with the indentation stripped.
    pub fn content(&self) -> &str {
        self.text.trim_start()
    }

    /// Count of leading whitespace characters.
    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn is_comment(&self) -> bool {
        self.comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Line::new("a").unwrap();
        let b = Line::new("a").unwrap();
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn indent_is_raw_column_count() {
        let l = Line::new("   odd").unwrap();
        assert_eq!(l.indent(), 3);
        assert_eq!(l.text(), "   odd");
        assert_eq!(l.content(), "odd");
    }

    #[test]
    fn comment_detected_after_indent() {
        assert!(Line::new("  :: note").unwrap().is_comment());
        assert!(!Line::new("  : note").unwrap().is_comment());
        assert!(!Line::new("a :: b").unwrap().is_comment());
    }

    #[test]
    fn custom_sentinel() {
        let l = Line::with_sentinel("# heading", "#").unwrap();
        assert!(l.is_comment());
        let l = Line::with_sentinel(":: not here", "#").unwrap();
        assert!(!l.is_comment());
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(Line::new("a\nb"), Err(LineError::EmbeddedNewline));
        assert_eq!(Line::new("   "), Err(LineError::Blank));
        assert_eq!(Line::new(""), Err(LineError::Blank));
    }

    #[test]
    fn new_lines_start_unfolded_and_visible() {
        let l = Line::new("x").unwrap();
        assert!(!l.folded);
        assert!(!l.hidden);
    }
}
