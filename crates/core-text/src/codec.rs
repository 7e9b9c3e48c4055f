//! Raw text <-> line record conversion.
//!
//! `parse` splits on line breaks (CRLF and lone CR are normalized to LF
//! first), drops blank lines and builds one `Line` per remaining line.
//! `serialize` newline-joins literal line texts. Indentation travels inside
//! the literal text, so a parse/serialize round trip reproduces the input
//! minus blank lines and with LF separators.

use crate::{Line, LineError};

/// Two-character marker that flags a line as a comment when it is the first
/// non-whitespace content of the line.
pub const COMMENT_SENTINEL: &str = "::";

/// Line ending style detected in raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Cr,
    Crlf,
}

/// Result of normalizing line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,   // LF-only content
    pub original: LineEnding, // majority style
    pub mixed: bool,          // more than one style encountered
}

/// Detect and normalize line endings of `input` to LF.
///
/// The reported `original` style is the majority one; ties resolve with the
/// precedence CRLF > LF > CR.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let bytes = input.as_bytes();
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut out = String::with_capacity(input.len());
    let mut seg_start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                // Only slice at '\r' so multi-byte sequences stay intact.
                out.push_str(&input[seg_start..i]);
                out.push('\n');
                if bytes.get(i + 1) == Some(&b'\n') {
                    crlf += 1;
                    i += 2;
                } else {
                    cr += 1;
                    i += 1;
                }
                seg_start = i;
            }
            b'\n' => {
                lf += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push_str(&input[seg_start..]);

    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|c| **c > 0).count() > 1;
    debug_assert!(!out.contains('\r'));
    NormalizedText {
        normalized: out,
        original,
        mixed,
    }
}

/// Count of leading whitespace characters (raw columns; a tab counts as one).
pub fn leading_indent(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}

/// Codec with a configurable comment sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCodec {
    comment_sentinel: String,
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::new(COMMENT_SENTINEL)
    }
}

impl TextCodec {
    pub fn new(comment_sentinel: impl Into<String>) -> Self {
        Self {
            comment_sentinel: comment_sentinel.into(),
        }
    }

    pub fn comment_sentinel(&self) -> &str {
        &self.comment_sentinel
    }

    /// Build a single line, detecting comments with this codec's sentinel.
    pub fn line(&self, text: &str) -> Result<Line, LineError> {
        Line::with_sentinel(text, &self.comment_sentinel)
    }

    /// Parse raw multi-line text into line records, dropping blank lines.
    pub fn parse(&self, raw: &str) -> Vec<Line> {
        let norm = normalize_line_endings(raw);
        norm.normalized
            .split('\n')
            .filter(|l| !l.trim().is_empty())
            .map(|l| Line::from_checked(l.to_string(), &self.comment_sentinel))
            .collect()
    }

    /// Newline-join the literal texts of `lines`.
    pub fn serialize<'a, I>(&self, lines: I) -> String
    where
        I: IntoIterator<Item = &'a Line>,
    {
        serialize(lines)
    }
}

/// Parse with the default sentinel.
pub fn parse(raw: &str) -> Vec<Line> {
    TextCodec::default().parse(raw)
}

/// Newline-join the literal texts of `lines`.
pub fn serialize<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a Line>,
{
    let mut out = String::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.text());
    }
    out
}
