#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use core_actions::{Action, DispatchResult, KeyTranslator, dispatch};
use core_clipboard::{Clipboard, MemoryOnly};
use core_events::parse_key_sequence;
use core_state::EditorState;

/// Editor state plus an in-memory clipboard, driven like the runtime does.
pub struct Harness {
    pub state: EditorState,
    pub clipboard: Clipboard<MemoryOnly>,
    pub translator: KeyTranslator,
}

impl Harness {
    pub fn new(raw: &str) -> Self {
        Self {
            state: EditorState::from_text(raw),
            clipboard: Clipboard::memory(),
            translator: KeyTranslator::default(),
        }
    }

    /// Start with the cursor on `index`.
    pub fn at(raw: &str, index: usize) -> Self {
        let mut h = Self::new(raw);
        let len = h.state.store.len();
        h.state.cursor.move_to(index, len).unwrap();
        h
    }

    pub async fn run(&mut self, action: Action) -> DispatchResult {
        dispatch(action, &mut self.state, &mut self.clipboard, &[]).await
    }

    /// Feed keys in angle-bracket notation, flushing at the end.
    pub async fn keys(&mut self, seq: &str) -> Vec<DispatchResult> {
        let mut actions = Vec::new();
        for key in parse_key_sequence(seq).unwrap() {
            actions.extend(self.translator.translate(&key));
        }
        actions.extend(self.translator.flush());
        let mut out = Vec::new();
        for action in actions {
            out.push(self.run(action).await);
        }
        out
    }

    pub fn texts(&self) -> Vec<&str> {
        self.state.store.iter().map(|l| l.text()).collect()
    }
}
