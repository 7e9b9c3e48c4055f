//! Dispatcher applying `Action` to mutable editor state.
//!
//! Decomposed into focused sub-modules:
//! * `motion`    - cursor movement, pointer selection, region mode
//! * `fold`      - fold / foldTops visibility flags
//! * `structure` - indent, dedent, merge, swapUp, swapDown
//! * `clip`      - delete, cut, copy, paste (clipboard is the only await point)
//! * `pad`       - free-text edit pad (edit / input / save / cancel)
//!
//! Every handler returns `Result<DispatchResult, EditError>`. Errors never
//! reach the user: `dispatch` logs them at debug level and turns them into a
//! clean result whose `skipped` field names the reason. Handlers validate
//! before mutating, so a skipped command leaves the state untouched.
//!
//! An open edit pad is modal: only pad commands, up/down (which close it)
//! and quit get through.

use crate::{Action, ActionObserver};
use core_clipboard::{Clipboard, ClipboardProvider};
use core_state::{EditError, EditorState};
use tracing::{debug, trace};

mod clip;
mod fold;
mod motion;
mod pad;
mod structure;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed (cursor, region, flags, text); re-render.
    pub dirty: bool,
    /// The line sequence itself was mutated.
    pub structural: bool,
    pub quit: bool,
    /// Why the command did nothing, when it did nothing.
    pub skipped: Option<EditError>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn structural() -> Self {
        Self {
            dirty: true,
            structural: true,
            ..Self::default()
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            ..Self::default()
        }
    }
    pub fn skipped(err: EditError) -> Self {
        Self {
            skipped: Some(err),
            ..Self::default()
        }
    }
}

/// Apply an action to editor state. Commands run to completion one at a
/// time; the clipboard is the only suspension point.
pub async fn dispatch<P: ClipboardProvider>(
    action: Action,
    state: &mut EditorState,
    clipboard: &mut Clipboard<P>,
    observers: &[Box<dyn ActionObserver>],
) -> DispatchResult {
    for obs in observers {
        obs.on_action(&action);
    }
    let name = action.name();
    let outcome = if state.pad.is_open() && !pad::admits(&action) {
        Err(EditError::NoEffect("edit pad open"))
    } else {
        run(action, state, clipboard).await
    };
    match outcome {
        Ok(result) => {
            if result.structural {
                state.dirty = true;
            }
            trace!(
                target: "actions.dispatch",
                action = name,
                dirty = result.dirty,
                structural = result.structural,
                lines = state.store.len(),
                cursor = ?state.cursor.line(),
                "dispatched"
            );
            result
        }
        Err(err) => {
            debug!(target: "actions.dispatch", action = name, reason = %err, "skipped");
            DispatchResult::skipped(err)
        }
    }
}

async fn run<P: ClipboardProvider>(
    action: Action,
    state: &mut EditorState,
    clipboard: &mut Clipboard<P>,
) -> Result<DispatchResult, EditError> {
    match action {
        Action::Up => motion::up(state),
        Action::Down => motion::down(state),
        Action::Select(index) => motion::select(state, index),
        Action::ToggleRegion => motion::toggle_region(state),
        Action::CycleRegion => motion::cycle_region(state),
        Action::Fold => fold::fold(state),
        Action::FoldTops => fold::fold_tops(state),
        Action::Merge => structure::merge(state),
        Action::Indent => structure::indent(state),
        Action::Dedent => structure::dedent(state),
        Action::SwapUp => structure::swap_up(state),
        Action::SwapDown => structure::swap_down(state),
        Action::Delete => clip::delete(state),
        Action::Cut => clip::cut(state, clipboard).await,
        Action::Copy => clip::copy(state, clipboard).await,
        Action::Paste => clip::paste(state, clipboard).await,
        Action::Edit => pad::edit(state),
        Action::PadInput(text) => pad::input(state, text),
        Action::Save => pad::save(state),
        Action::Cancel => pad::cancel(state),
        Action::Quit => Ok(DispatchResult::quit()),
    }
}
