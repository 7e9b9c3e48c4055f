//! Editor state: line store, cursor model and the free-text edit pad.
//!
//! `EditorState` is the single mutable aggregate the dispatcher operates on.
//! Structure is never stored: the selection (`region`) is derived from the
//! store and cursor on every call through the pure functions in `region`.
//!
//! Ownership model:
//! * `store` owns every `Line`; nothing else holds line references across a
//!   mutation.
//! * `cursor` holds an index, not a handle. Any mutation that can shorten the
//!   sequence must be followed by `clamp_cursor`.
//! * `pad` is a detached text buffer: it never touches the store until the
//!   dispatcher saves it.
//!
//! Concurrency: none. All mutation happens on the caller's thread, one
//! command at a time; a multi-threaded host must serialize access (the
//! runtime does so through its single event loop).

use core_text::{Line, TextCodec};
use std::ops::Range;

pub mod cursor;
mod error;
pub mod region;
pub mod store;

pub use cursor::CursorModel;
pub use error::EditError;
pub use region::{RegionKind, RegionScope, extended_region_at, region_at, region_for_scope};
pub use store::LineStore;

/// Free-text edit buffer seeded from the cursor line and its region.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditPad {
    open: bool,
    text: String,
}

impl EditPad {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Open the pad with `seed` as its content.
    pub fn open(&mut self, seed: String) {
        self.text = seed;
        self.open = true;
    }

    /// Close the pad. The text is kept until the next `open`.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Replace the pad content (the user typed into it).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// Top-level editor state container (single document).
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub store: LineStore,
    pub cursor: CursorModel,
    pub pad: EditPad,
    /// Set by any mutation of the store; cleared by the host.
    pub dirty: bool,
}

impl EditorState {
    pub fn new(store: LineStore) -> Self {
        Self {
            store,
            cursor: CursorModel::new(),
            pad: EditPad::default(),
            dirty: false,
        }
    }

    pub fn from_text(raw: &str) -> Self {
        Self::new(LineStore::from_text(raw))
    }

    pub fn from_text_with(codec: TextCodec, raw: &str) -> Self {
        Self::new(LineStore::from_text_with(codec, raw))
    }

    /// Valid cursor index, or `InvalidCursor` when unset or stale.
    pub fn cursor_index(&self) -> Result<usize, EditError> {
        match self.cursor.line() {
            Some(i) if i < self.store.len() => Ok(i),
            _ => Err(EditError::InvalidCursor),
        }
    }

    pub fn cursor_line(&self) -> Option<&Line> {
        self.cursor_index().ok().and_then(|i| self.store.get(i))
    }

    /// Active selection: the cursor line's region under the current scope.
    /// Empty when no cursor is set or region mode is off.
    pub fn region(&self) -> Range<usize> {
        match self.cursor_index() {
            Ok(i) => region_for_scope(self.store.lines(), i, self.cursor.scope()),
            Err(_) => 0..0,
        }
    }

    /// Group region of an arbitrary line, ignoring region mode.
    pub fn region_at(&self, index: usize) -> Range<usize> {
        region_at(self.store.lines(), index)
    }

    /// Cursor line plus active region as one contiguous index range.
    pub fn operand(&self) -> Result<Range<usize>, EditError> {
        let i = self.cursor_index()?;
        let region = self.region();
        Ok(i..region.end.max(i + 1))
    }

    /// Newline-joined literal text of the operand.
    pub fn operand_text(&self) -> Result<String, EditError> {
        let range = self.operand()?;
        Ok(self.store.texts(range).join("\n"))
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.region().contains(&index)
    }

    /// Pointer selection of line `index`.
    ///
    /// Clicking the cursor line with a non-empty active region deselects
    /// everything; clicking it otherwise turns region mode on. Clicking any
    /// other line moves the cursor there with region mode off.
    pub fn click(&mut self, index: usize) -> Result<(), EditError> {
        let len = self.store.len();
        if index >= len {
            return Err(EditError::OutOfRange { index, len });
        }
        if self.cursor.line() == Some(index) {
            if self.region().is_empty() {
                self.cursor.set_region(true);
            } else {
                self.cursor.clear();
            }
        } else {
            self.cursor.move_to(index, len)?;
            self.cursor.set_region(false);
        }
        Ok(())
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor.clamp_after_mutation(self.store.len());
    }

    pub fn serialize(&self) -> String {
        self.store.serialize()
    }
}
