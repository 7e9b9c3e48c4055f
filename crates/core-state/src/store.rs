//! Ordered line storage.
//!
//! `LineStore` is the single source of truth for document order. It is a
//! plain `Vec<Line>`: neighbor lookup by index is O(1), lookup by `LineId`
//! is a linear scan (documents are small and edits are user paced).
//!
//! Invariants (hold after every public call):
//! * Untouched lines keep their relative order across any mutation.
//! * Indents are unsigned; no operation can produce a negative indent.
//! * Failed operations leave the store unchanged.

use crate::EditError;
use core_text::{Line, LineId, TextCodec};
use std::ops::Range;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct LineStore {
    lines: Vec<Line>,
    codec: TextCodec,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(codec: TextCodec) -> Self {
        Self {
            lines: Vec::new(),
            codec,
        }
    }

    /// Parse `raw` with the default codec.
    pub fn from_text(raw: &str) -> Self {
        Self::from_text_with(TextCodec::default(), raw)
    }

    pub fn from_text_with(codec: TextCodec, raw: &str) -> Self {
        let lines = codec.parse(raw);
        Self { lines, codec }
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self {
            lines,
            codec: TextCodec::default(),
        }
    }

    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    /// Parse raw text with this store's codec (lines are not inserted).
    pub fn parse(&self, raw: &str) -> Vec<Line> {
        self.codec.parse(raw)
    }

    /// Serialize the whole document.
    pub fn serialize(&self) -> String {
        self.codec.serialize(&self.lines)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Line> {
        self.lines.get_mut(index)
    }

    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|l| l.id() == id)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id() == id)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Mutable access to a contiguous range, used to flip fold/visibility
    /// flags. Clamped to the sequence.
    pub fn lines_mut(&mut self, range: Range<usize>) -> &mut [Line] {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        &mut self.lines[start..end]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Literal texts of the lines in `range` (clamped to the sequence).
    pub fn texts(&self, range: Range<usize>) -> Vec<&str> {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines[start..end].iter().map(|l| l.text()).collect()
    }

    fn require_index(&self, id: LineId) -> Result<usize, EditError> {
        self.index_of(id).ok_or(EditError::UnknownLine(id))
    }

    /// Insert `lines` at sequence position `index` (`index == len` appends).
    pub fn insert_at(&mut self, index: usize, lines: Vec<Line>) -> Result<(), EditError> {
        if index > self.lines.len() {
            return Err(EditError::OutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        let count = lines.len();
        self.lines.splice(index..index, lines);
        trace!(target: "state.store", op = "insert", index, count, len = self.lines.len(), "store_mutation");
        Ok(())
    }

    /// Insert `lines` immediately before `ref_id`. Returns the index of the
    /// first inserted line (equal to the reference's old index).
    pub fn insert_before(&mut self, ref_id: LineId, lines: Vec<Line>) -> Result<usize, EditError> {
        let idx = self.require_index(ref_id)?;
        self.insert_at(idx, lines)?;
        Ok(idx)
    }

    /// Insert `lines` immediately after `ref_id`. Returns the index of the
    /// first inserted line.
    pub fn insert_after(&mut self, ref_id: LineId, lines: Vec<Line>) -> Result<usize, EditError> {
        let idx = self.require_index(ref_id)? + 1;
        self.insert_at(idx, lines)?;
        Ok(idx)
    }

    pub fn remove(&mut self, id: LineId) -> Result<Line, EditError> {
        let idx = self.require_index(id)?;
        let removed = self.lines.remove(idx);
        trace!(target: "state.store", op = "remove", index = idx, len = self.lines.len(), "store_mutation");
        Ok(removed)
    }

    /// Remove every line named in `ids`. All ids are validated first so an
    /// unknown id leaves the store untouched. Removed lines are returned in
    /// document order.
    pub fn remove_range(&mut self, ids: &[LineId]) -> Result<Vec<Line>, EditError> {
        for id in ids {
            self.require_index(*id)?;
        }
        let mut removed = Vec::with_capacity(ids.len());
        let mut kept = Vec::with_capacity(self.lines.len().saturating_sub(ids.len()));
        for line in self.lines.drain(..) {
            if ids.contains(&line.id()) {
                removed.push(line);
            } else {
                kept.push(line);
            }
        }
        self.lines = kept;
        trace!(target: "state.store", op = "remove_range", count = removed.len(), len = self.lines.len(), "store_mutation");
        Ok(removed)
    }

    /// Remove the contiguous index range `range`, returning the removed lines.
    pub fn remove_indices(&mut self, range: Range<usize>) -> Result<Vec<Line>, EditError> {
        if range.start > range.end || range.end > self.lines.len() {
            return Err(EditError::OutOfRange {
                index: range.end,
                len: self.lines.len(),
            });
        }
        let removed: Vec<Line> = self.lines.drain(range.clone()).collect();
        trace!(target: "state.store", op = "remove_indices", start = range.start, count = removed.len(), len = self.lines.len(), "store_mutation");
        Ok(removed)
    }

    /// Replace `id` with zero or more lines. Returns the index where the
    /// replacement starts.
    pub fn replace(&mut self, id: LineId, lines: Vec<Line>) -> Result<usize, EditError> {
        let idx = self.require_index(id)?;
        let count = lines.len();
        self.lines.splice(idx..idx + 1, lines);
        trace!(target: "state.store", op = "replace", index = idx, count, len = self.lines.len(), "store_mutation");
        Ok(idx)
    }

    /// Give the line `id` new text. The text must be a single non-blank
    /// line; the line gets a fresh id and cleared fold flags.
    pub fn set_text(&mut self, id: LineId, text: &str) -> Result<usize, EditError> {
        let line = self.codec.line(text)?;
        self.replace(id, vec![line])
    }
}
