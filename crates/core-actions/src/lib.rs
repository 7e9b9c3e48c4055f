//! Outline editing actions: the command vocabulary, key translation and the
//! dispatcher that applies commands to `EditorState`.

use core_keymap::MappingOutput;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod dispatcher;
mod key_translator;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::KeyTranslator;

/// Every operation the editor core understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    /// Pointer selection of a line (see `EditorState::click`).
    Select(usize),
    ToggleRegion,
    CycleRegion,
    Fold,
    FoldTops,
    Merge,
    Indent,
    Dedent,
    SwapUp,
    SwapDown,
    Delete,
    Cut,
    Copy,
    Paste,
    /// Open the edit pad, or close it when already open.
    Edit,
    /// Replace the pad contents.
    PadInput(String),
    Save,
    Cancel,
    Quit,
}

impl Action {
    /// Command name (`swapUp`, `foldTops`, ...). Parameterized actions
    /// report their bare name.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Select(_) => "select",
            Action::ToggleRegion => "toggleRegion",
            Action::CycleRegion => "cycleRegion",
            Action::Fold => "fold",
            Action::FoldTops => "foldTops",
            Action::Merge => "merge",
            Action::Indent => "indent",
            Action::Dedent => "dedent",
            Action::SwapUp => "swapUp",
            Action::SwapDown => "swapDown",
            Action::Delete => "delete",
            Action::Cut => "cut",
            Action::Copy => "copy",
            Action::Paste => "paste",
            Action::Edit => "edit",
            Action::PadInput(_) => "padInput",
            Action::Save => "save",
            Action::Cancel => "cancel",
            Action::Quit => "quit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MappingOutput> for Action {
    fn from(out: MappingOutput) -> Self {
        match out {
            MappingOutput::Up => Action::Up,
            MappingOutput::Down => Action::Down,
            MappingOutput::SwapUp => Action::SwapUp,
            MappingOutput::SwapDown => Action::SwapDown,
            MappingOutput::Indent => Action::Indent,
            MappingOutput::Dedent => Action::Dedent,
            MappingOutput::Delete => Action::Delete,
            MappingOutput::Copy => Action::Copy,
            MappingOutput::Cut => Action::Cut,
            MappingOutput::Paste => Action::Paste,
            MappingOutput::Merge => Action::Merge,
            MappingOutput::ToggleRegion => Action::ToggleRegion,
            MappingOutput::CycleRegion => Action::CycleRegion,
            MappingOutput::Fold => Action::Fold,
            MappingOutput::FoldTops => Action::FoldTops,
            MappingOutput::Edit => Action::Edit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    /// Parse a parameterless command name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save" => Ok(Action::Save),
            "cancel" => Ok(Action::Cancel),
            "quit" | "q" => Ok(Action::Quit),
            other => other
                .parse::<MappingOutput>()
                .map(Action::from)
                .map_err(|_| UnknownAction(other.to_string())),
        }
    }
}

/// Observer notified before each action is applied.
pub trait ActionObserver: Send + Sync {
    fn on_action(&self, action: &Action);
}
