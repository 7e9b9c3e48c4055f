//! Free-text edit pad: edit (toggle), input, save, cancel.

use super::DispatchResult;
use crate::Action;
use core_state::{EditError, EditorState};
use tracing::debug;

/// Open the pad seeded with the operand text, or close it if open.
pub(super) fn edit(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    if state.pad.is_open() {
        state.pad.close();
        return Ok(DispatchResult::dirty());
    }
    let seed = state.operand_text()?;
    state.pad.open(seed);
    Ok(DispatchResult::dirty())
}

pub(super) fn input(state: &mut EditorState, text: String) -> Result<DispatchResult, EditError> {
    require_open(state)?;
    state.pad.set_text(text);
    Ok(DispatchResult::dirty())
}

/// Replace the operand with the pad text re-parsed, then close the pad.
pub(super) fn save(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    require_open(state)?;
    let index = state.cursor_index()?;
    let range = state.operand()?;
    let lines = state.store.parse(state.pad.text());
    let count = lines.len();
    state.store.remove_indices(range.clone())?;
    state.store.insert_at(index, lines)?;
    state.pad.close();
    state.clamp_cursor();
    debug!(target: "actions.dispatch", op = "save", index, removed = range.len(), inserted = count, "pad_saved");
    Ok(DispatchResult::structural())
}

pub(super) fn cancel(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    require_open(state)?;
    state.pad.close();
    Ok(DispatchResult::dirty())
}

/// Commands that may run while the pad is open.
pub(super) fn admits(action: &Action) -> bool {
    matches!(
        action,
        Action::Up
            | Action::Down
            | Action::Edit
            | Action::PadInput(_)
            | Action::Save
            | Action::Cancel
            | Action::Quit
    )
}

fn require_open(state: &EditorState) -> Result<(), EditError> {
    if state.pad.is_open() {
        Ok(())
    } else {
        Err(EditError::NoEffect("edit pad closed"))
    }
}
