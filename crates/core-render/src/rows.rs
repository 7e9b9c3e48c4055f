//! Per-line display snapshot.

use bitflags::bitflags;
use core_state::EditorState;
use core_text::LineId;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RowFlags: u8 {
        const CURSOR   = 0b0000_0001;
        const SELECTED = 0b0000_0010; // inside the active region
        const FOLDED   = 0b0000_0100;
        const HIDDEN   = 0b0000_1000; // inside a fold; not drawn
        const COMMENT  = 0b0001_0000;
    }
}

/// One line as the view sees it. Borrows text from the store, so a row
/// snapshot lives only as long as the state it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow<'a> {
    pub index: usize,
    pub id: LineId,
    pub text: &'a str,
    pub indent: usize,
    pub flags: RowFlags,
}

impl RenderRow<'_> {
    pub fn is_cursor(&self) -> bool {
        self.flags.contains(RowFlags::CURSOR)
    }
    pub fn is_selected(&self) -> bool {
        self.flags.contains(RowFlags::SELECTED)
    }
    pub fn is_folded(&self) -> bool {
        self.flags.contains(RowFlags::FOLDED)
    }
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(RowFlags::HIDDEN)
    }
    pub fn is_comment(&self) -> bool {
        self.flags.contains(RowFlags::COMMENT)
    }
}

/// Snapshot every line in document order, hidden ones included.
pub fn render_rows(state: &EditorState) -> Vec<RenderRow<'_>> {
    let cursor = state.cursor.line();
    let region = state.region();
    state
        .store
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let mut flags = RowFlags::empty();
            flags.set(RowFlags::CURSOR, cursor == Some(index));
            flags.set(RowFlags::SELECTED, region.contains(&index));
            flags.set(RowFlags::FOLDED, line.folded);
            flags.set(RowFlags::HIDDEN, line.hidden);
            flags.set(RowFlags::COMMENT, line.is_comment());
            RenderRow {
                index,
                id: line.id(),
                text: line.text(),
                indent: line.indent(),
                flags,
            }
        })
        .collect()
}
