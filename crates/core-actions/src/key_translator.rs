//! KeyTranslator: stateful key -> Action translation over the mapping trie.
//!
//! State machine:
//! * Keys accumulate in `pending` until the trie reports a match or that the
//!   first key starts no binding.
//! * A match that is also a prefix of a longer binding (`ambiguous`) waits
//!   for the next key; `flush` resolves it eagerly (the runtime calls it at
//!   the end of each input batch).
//! * Unbound keys are dropped. Chords with Ctrl, Alt or Meta held are never
//!   consumed unless explicitly bound, so the host keeps its own shortcuts.

use crate::Action;
use core_events::KeyEvent;
use core_keymap::{MappingSpec, MappingTrie, Resolution, baseline_outline_specs};
use tracing::trace;

#[derive(Debug)]
pub struct KeyTranslator {
    trie: MappingTrie,
    pending: Vec<KeyEvent>,
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self::new(baseline_outline_specs())
    }
}

impl KeyTranslator {
    pub fn new(specs: Vec<MappingSpec>) -> Self {
        Self {
            trie: MappingTrie::build(specs),
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> &[KeyEvent] {
        &self.pending
    }

    /// Feed one key; returns the actions it completed (often none or one).
    pub fn translate(&mut self, key: &KeyEvent) -> Vec<Action> {
        self.pending.push(*key);
        self.drain(false)
    }

    /// Resolve whatever is pending without waiting for more keys.
    pub fn flush(&mut self) -> Vec<Action> {
        self.drain(true)
    }

    fn drain(&mut self, eager: bool) -> Vec<Action> {
        let mut out = Vec::new();
        while !self.pending.is_empty() {
            match self.trie.resolve(&self.pending) {
                Resolution::Matched {
                    ambiguous: true, ..
                } if !eager => break,
                Resolution::Matched {
                    consumed, output, ..
                } => {
                    trace!(target: "input.map", command = %output, consumed, "matched");
                    self.pending.drain(..consumed);
                    out.push(Action::from(output));
                }
                Resolution::NeedMore if !eager => break,
                Resolution::NeedMore => {
                    trace!(target: "input.map", dropped = self.pending.len(), "incomplete_sequence_dropped");
                    self.pending.clear();
                }
                Resolution::Unbound(key) => {
                    if key.has_command_modifier() {
                        trace!(target: "input.map", key = %key, "passthrough");
                    } else {
                        trace!(target: "input.map", key = %key, "unbound");
                    }
                    self.pending.remove(0);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyModifiers, parse_key_sequence};
    use core_keymap::MappingOutput;
    use pretty_assertions::assert_eq;

    fn feed(t: &mut KeyTranslator, keys: &str) -> Vec<Action> {
        let mut out = Vec::new();
        for k in parse_key_sequence(keys).unwrap() {
            out.extend(t.translate(&k));
        }
        out
    }

    #[test]
    fn default_bindings() {
        let mut t = KeyTranslator::default();
        assert_eq!(
            feed(&mut t, "jkJK<Tab> "),
            vec![
                Action::Down,
                Action::Up,
                Action::SwapDown,
                Action::SwapUp,
                Action::Fold,
                Action::ToggleRegion
            ]
        );
        assert!(t.pending().is_empty());
    }

    #[test]
    fn modified_keys_pass_through() {
        let mut t = KeyTranslator::default();
        for mods in [KeyModifiers::CTRL, KeyModifiers::META, KeyModifiers::ALT] {
            let key = KeyEvent::new(KeyCode::Char('j'), mods);
            assert!(t.translate(&key).is_empty());
        }
        assert!(t.pending().is_empty());
    }

    #[test]
    fn bound_chord_is_consumed() {
        let mut specs = baseline_outline_specs();
        specs.push(MappingSpec::parse("<C-e>", MappingOutput::Edit).unwrap());
        let mut t = KeyTranslator::new(specs);
        assert_eq!(feed(&mut t, "<C-e>"), vec![Action::Edit]);
    }

    #[test]
    fn unbound_keys_are_dropped() {
        let mut t = KeyTranslator::default();
        assert_eq!(feed(&mut t, "zqj"), vec![Action::Down]);
    }

    #[test]
    fn ambiguous_waits_for_next_key_or_flush() {
        let mut specs = baseline_outline_specs();
        specs.push(MappingSpec::parse("dd", MappingOutput::Cut).unwrap());
        let mut t = KeyTranslator::new(specs);
        assert!(feed(&mut t, "d").is_empty());
        assert_eq!(t.pending().len(), 1);
        assert_eq!(feed(&mut t, "j"), vec![Action::Delete, Action::Down]);
        assert_eq!(feed(&mut t, "dd"), vec![Action::Cut]);
        assert!(feed(&mut t, "d").is_empty());
        assert_eq!(t.flush(), vec![Action::Delete]);
    }

    #[test]
    fn incomplete_sequence_dropped_on_flush() {
        let mut specs = baseline_outline_specs();
        specs.push(MappingSpec::parse("gt", MappingOutput::FoldTops).unwrap());
        let mut t = KeyTranslator::new(specs);
        assert!(feed(&mut t, "g").is_empty());
        assert!(t.flush().is_empty());
        assert!(t.pending().is_empty());
        assert_eq!(feed(&mut t, "gt"), vec![Action::FoldTops]);
    }
}
