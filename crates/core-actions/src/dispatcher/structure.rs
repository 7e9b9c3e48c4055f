//! Structural edits: indent, dedent, merge, swapUp, swapDown.
//!
//! Each rebuilds the affected text and splices freshly parsed lines back in,
//! so rewritten lines come back unfolded and visible with new ids. Indent
//! and dedent act on the operand (cursor line plus active region); merge and
//! swap act on the cursor line alone.

use super::DispatchResult;
use core_state::{EditError, EditorState};
use tracing::trace;

const INDENT_UNIT: &str = "  ";

/// Replace the operand with `text` re-parsed; the cursor stays on its index.
fn rewrite_operand(
    state: &mut EditorState,
    op: &'static str,
    text: String,
) -> Result<DispatchResult, EditError> {
    let index = state.cursor_index()?;
    let range = state.operand()?;
    let lines = state.store.parse(&text);
    let count = lines.len();
    state.store.remove_indices(range.clone())?;
    state.store.insert_at(index, lines)?;
    state.clamp_cursor();
    trace!(target: "actions.dispatch", op, index, removed = range.len(), inserted = count, "rewrite");
    Ok(DispatchResult::structural())
}

pub(super) fn indent(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let range = state.operand()?;
    let text = state
        .store
        .texts(range)
        .into_iter()
        .map(|t| format!("{INDENT_UNIT}{t}"))
        .collect::<Vec<_>>()
        .join("\n");
    rewrite_operand(state, "indent", text)
}

pub(super) fn dedent(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let indent = state.cursor_line().ok_or(EditError::InvalidCursor)?.indent();
    if indent < INDENT_UNIT.len() {
        return Err(EditError::NoEffect("cursor line already at column 0"));
    }
    let range = state.operand()?;
    let text = state.store.lines()[range]
        .iter()
        .map(|l| {
            if l.indent() >= INDENT_UNIT.len() {
                strip_chars(l.text(), INDENT_UNIT.len())
            } else {
                l.text()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    rewrite_operand(state, "dedent", text)
}

/// Drop the first `n` characters (not bytes) of `text`.
fn strip_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((at, _)) => &text[at..],
        None => "",
    }
}

/// Append the cursor line, trimmed, to the previous line with two spaces.
pub(super) fn merge(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let index = state.cursor_index()?;
    if index == 0 {
        return Err(EditError::NoEffect("no previous line"));
    }
    let (prev, cur) = (&state.store.lines()[index - 1], &state.store.lines()[index]);
    let merged = format!("{}{INDENT_UNIT}{}", prev.text(), cur.text().trim());
    let (prev_id, cur_id) = (prev.id(), cur.id());
    state.store.set_text(prev_id, &merged)?;
    state.store.remove(cur_id)?;
    state.cursor.move_to(index - 1, state.store.len())?;
    Ok(DispatchResult::structural())
}

/// Move the cursor line's text above the previous line. The region is not
/// carried along.
pub(super) fn swap_up(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let index = state.cursor_index()?;
    if index == 0 {
        return Err(EditError::NoEffect("no previous line"));
    }
    move_line(state, index, index - 1)
}

/// Move the cursor line's text below the next line.
pub(super) fn swap_down(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let index = state.cursor_index()?;
    if index + 1 >= state.store.len() {
        return Err(EditError::NoEffect("no next line"));
    }
    move_line(state, index, index + 1)
}

fn move_line(state: &mut EditorState, from: usize, to: usize) -> Result<DispatchResult, EditError> {
    let text = state.store.lines()[from].text().to_string();
    let lines = state.store.parse(&text);
    state.store.remove_indices(from..from + 1)?;
    state.store.insert_at(to, lines)?;
    state.cursor.move_to(to, state.store.len())?;
    trace!(target: "actions.dispatch", op = "swap", from, to, "rewrite");
    Ok(DispatchResult::structural())
}
