//! Fold handling.
//!
//! Folding only flips `folded` / `hidden` flags; no line is added or removed.
//! `fold` always resolves the group region of the cursor line, as if region
//! mode were on, and leaves the caller's region mode as it found it.

use super::DispatchResult;
use core_state::{EditError, EditorState, RegionScope};
use std::ops::Range;

pub(super) fn fold(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let index = state.cursor_index()?;
    let saved = state.cursor.scope();
    state.cursor.set_scope(RegionScope::Group);
    let region = state.region();
    state.cursor.set_scope(saved);

    let folded = state.store.get(index).is_some_and(|l| l.folded);
    if folded {
        unfold_region(state, region);
    } else {
        for line in state.store.lines_mut(region) {
            line.hidden = true;
        }
    }
    if let Some(line) = state.store.get_mut(index) {
        line.folded = !folded;
    }
    Ok(DispatchResult::dirty())
}

/// Reveal `region`, except lines inside the region of a nested line that is
/// itself still folded.
fn unfold_region(state: &mut EditorState, region: Range<usize>) {
    let mut shadowed: Vec<Range<usize>> = Vec::new();
    for i in region {
        let Some(line) = state.store.get(i) else {
            break;
        };
        if line.folded {
            shadowed.push(state.region_at(i));
        }
        if !shadowed.iter().any(|r| r.contains(&i))
            && let Some(line) = state.store.get_mut(i)
        {
            line.hidden = false;
        }
    }
}

/// Collapse the document to its top-level lines: indent-0 lines become
/// folded and visible, every other line is hidden. Needs no cursor.
pub(super) fn fold_tops(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    let len = state.store.len();
    for line in state.store.lines_mut(0..len) {
        if line.indent() == 0 {
            line.folded = true;
            line.hidden = false;
        } else {
            line.hidden = true;
        }
    }
    Ok(DispatchResult::dirty())
}
