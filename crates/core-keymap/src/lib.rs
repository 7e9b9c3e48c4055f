//! core-keymap: key sequence -> outline command mapping engine.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the pending buffer.
//! - Bindings compiled into a trie; multi-key sequences share prefixes.
//! - A strict prefix of a longer binding yields `NeedMore`; a terminal that
//!   is also a prefix is reported as `Matched { ambiguous: true }` and the
//!   caller decides whether to wait.
//! - No side effects: logging only at TRACE for traversal steps.

use core_events::{KeyEvent, KeyParseError, parse_key_sequence};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

// -------------------------------------------------------------------------------------------------
// Symbolic Output
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingOutput {
    Up,
    Down,
    SwapUp,
    SwapDown,
    Indent,
    Dedent,
    Delete,
    Copy,
    Cut,
    Paste,
    Merge,
    ToggleRegion,
    CycleRegion,
    Fold,
    FoldTops,
    Edit,
}

impl MappingOutput {
    pub const ALL: [MappingOutput; 16] = [
        MappingOutput::Up,
        MappingOutput::Down,
        MappingOutput::SwapUp,
        MappingOutput::SwapDown,
        MappingOutput::Indent,
        MappingOutput::Dedent,
        MappingOutput::Delete,
        MappingOutput::Copy,
        MappingOutput::Cut,
        MappingOutput::Paste,
        MappingOutput::Merge,
        MappingOutput::ToggleRegion,
        MappingOutput::CycleRegion,
        MappingOutput::Fold,
        MappingOutput::FoldTops,
        MappingOutput::Edit,
    ];

    /// Command name as used by bindings and the `:name` protocol.
    pub fn name(self) -> &'static str {
        match self {
            MappingOutput::Up => "up",
            MappingOutput::Down => "down",
            MappingOutput::SwapUp => "swapUp",
            MappingOutput::SwapDown => "swapDown",
            MappingOutput::Indent => "indent",
            MappingOutput::Dedent => "dedent",
            MappingOutput::Delete => "delete",
            MappingOutput::Copy => "copy",
            MappingOutput::Cut => "cut",
            MappingOutput::Paste => "paste",
            MappingOutput::Merge => "merge",
            MappingOutput::ToggleRegion => "toggleRegion",
            MappingOutput::CycleRegion => "cycleRegion",
            MappingOutput::Fold => "fold",
            MappingOutput::FoldTops => "foldTops",
            MappingOutput::Edit => "edit",
        }
    }
}

impl fmt::Display for MappingOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command `{0}`")]
pub struct UnknownCommand(pub String);

impl FromStr for MappingOutput {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MappingOutput::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

// -------------------------------------------------------------------------------------------------
// Mapping Specification
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct MappingSpec {
    pub sequence: Vec<KeyEvent>,
    pub output: MappingOutput,
}

impl MappingSpec {
    pub fn new(sequence: Vec<KeyEvent>, output: MappingOutput) -> Self {
        Self { sequence, output }
    }

    /// Parse a binding given in key notation (`"gg"`, `"<C-x>"`).
    pub fn parse(keys: &str, output: MappingOutput) -> Result<Self, KeyParseError> {
        Ok(Self::new(parse_key_sequence(keys)?, output))
    }

    fn single(c: char, output: MappingOutput) -> Self {
        Self::new(vec![KeyEvent::char(c)], output)
    }
}

// -------------------------------------------------------------------------------------------------
// Trie Representation
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
struct Edge {
    key: KeyEvent,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node {
    terminal: Option<usize>, // index into mappings vec
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

#[derive(Debug)]
pub struct MappingTrie {
    nodes: Vec<Node>,
    mappings: Vec<MappingSpec>,
}

impl MappingTrie {
    pub fn build(specs: Vec<MappingSpec>) -> Self {
        let mut trie = MappingTrie {
            nodes: vec![Node::new()],
            mappings: specs,
        };
        for (idx, m) in trie.mappings.iter().enumerate() {
            if m.sequence.is_empty() {
                continue;
            }
            let mut cur = 0usize;
            for key in &m.sequence {
                // find or create edge
                let next = if let Some(e) = trie.nodes[cur].edges.iter().find(|e| e.key == *key) {
                    e.next
                } else {
                    let new_idx = trie.nodes.len();
                    trie.nodes.push(Node::new());
                    trie.nodes[cur].edges.push(Edge {
                        key: *key,
                        next: new_idx,
                    });
                    new_idx
                };
                cur = next;
            }
            if trie.nodes[cur].terminal.is_some() {
                // later mapping overrides earlier
                trace!(
                    target: "input.map",
                    mapping_index = idx,
                    node = cur,
                    "terminal_override"
                );
            }
            trie.nodes[cur].terminal = Some(idx);
        }
        trie
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn resolve(&self, buffer: &[KeyEvent]) -> Resolution {
        let mut node_idx = 0usize;
        let mut walked = 0usize;
        let mut last_terminal: Option<(usize, usize)> = None; // (consumed, mapping index)
        for (i, key) in buffer.iter().enumerate() {
            let Some(edge) = self.nodes[node_idx].edges.iter().find(|e| e.key == *key) else {
                break;
            };
            node_idx = edge.next;
            walked = i + 1;
            trace!(target: "input.map", step = i, key = %key, node = node_idx, "advance");
            if let Some(mi) = self.nodes[node_idx].terminal {
                last_terminal = Some((walked, mi));
            }
        }
        // the whole buffer is a prefix of something longer
        let open = walked == buffer.len() && !self.nodes[node_idx].edges.is_empty();
        match (last_terminal, buffer.first()) {
            (Some((consumed, mi)), _) => Resolution::Matched {
                consumed,
                output: self.mappings[mi].output,
                ambiguous: open,
            },
            (None, Some(first)) if !open => Resolution::Unbound(*first),
            _ => Resolution::NeedMore,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Resolution Result
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched {
        consumed: usize,
        output: MappingOutput,
        /// The matched sequence is also a prefix of a longer binding.
        ambiguous: bool,
    },
    /// Strict prefix of one or more bindings.
    NeedMore,
    /// First key starts no binding.
    Unbound(KeyEvent),
}

// -------------------------------------------------------------------------------------------------
// Default Outline Bindings
// -------------------------------------------------------------------------------------------------
pub fn baseline_outline_specs() -> Vec<MappingSpec> {
    use MappingOutput as C;
    vec![
        MappingSpec::single('j', C::Down),
        MappingSpec::single('J', C::SwapDown),
        MappingSpec::single('k', C::Up),
        MappingSpec::single('K', C::SwapUp),
        MappingSpec::single('H', C::Dedent),
        MappingSpec::single('L', C::Indent),
        MappingSpec::single('d', C::Delete),
        MappingSpec::single('c', C::Copy),
        MappingSpec::single('x', C::Cut),
        MappingSpec::single('v', C::Paste),
        MappingSpec::single('m', C::Merge),
        MappingSpec::single(' ', C::ToggleRegion),
        MappingSpec::single('\t', C::Fold),
    ]
}

/// Error building user bindings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error(transparent)]
    Keys(#[from] KeyParseError),
    #[error(transparent)]
    Command(#[from] UnknownCommand),
}

/// Parse one `keys = "command"` binding.
pub fn parse_binding(keys: &str, command: &str) -> Result<MappingSpec, BindingError> {
    let output = command.parse()?;
    Ok(MappingSpec::parse(keys, output)?)
}
