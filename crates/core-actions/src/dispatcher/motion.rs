//! Motion sub-dispatch (cursor movement and region mode).
//!
//! * Up/down move by one line in document order, hidden lines included, and
//!   close an open edit pad. Region mode survives the move.
//! * An unset cursor lands on the first line.

use super::DispatchResult;
use core_state::{EditError, EditorState};

pub(super) fn up(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let len = non_empty(state)?;
    state.pad.close();
    state.cursor.move_up(len);
    Ok(DispatchResult::dirty())
}

pub(super) fn down(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let len = non_empty(state)?;
    state.pad.close();
    state.cursor.move_down(len);
    Ok(DispatchResult::dirty())
}

pub(super) fn select(state: &mut EditorState, index: usize) -> Result<DispatchResult, EditError> {
    state.click(index)?;
    Ok(DispatchResult::dirty())
}

pub(super) fn toggle_region(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    state.cursor.toggle_region();
    Ok(DispatchResult::dirty())
}

pub(super) fn cycle_region(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    state.cursor.cycle_region();
    Ok(DispatchResult::dirty())
}

fn non_empty(state: &EditorState) -> Result<usize, EditError> {
    match state.store.len() {
        0 => Err(EditError::NoEffect("empty document")),
        len => Ok(len),
    }
}
