//! Core event types and channel helpers for treeline.
//!
//! Everything the runtime loop consumes flows through one bounded channel of
//! `Event`s. Producers (currently only the stdin line reader) implement
//! `AsyncEventSource` and are spawned through `EventSourceRegistry`.

use std::fmt;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;

mod notation;
mod protocol;

pub use notation::{KeyParseError, format_key_sequence, parse_key_sequence};
pub use protocol::{LineSource, decode_line};

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// Single consumer (the runtime loop) and, today, a single producer. Producers await `send` and
// therefore park when the loop falls behind instead of dropping keys: an outline edit stream is
// not lossy-tolerant. A send error means the loop is gone and the producer must exit.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Create the bounded runtime channel.
pub fn event_channel() -> (Sender<Event>, Receiver<Event>) {
    mpsc::channel(EVENT_CHANNEL_CAP)
}

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Command(CommandEvent),
    Shutdown,
}

/// Requests addressed to the runtime rather than the editor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    Quit,
    /// Print the serialized document.
    Dump,
    /// Run an editor command by name (`fold`, `swapUp`, ...).
    Named(String),
}

/// Normalized user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// No more keys follow for now; pending sequences should resolve.
    KeysEnd,
    /// Pointer selection of a line by document index.
    Click(usize),
    /// Replacement text for the open edit pad.
    PadText(String),
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------

/// Trait implemented by any async event producer. Implementors usually hold configuration and
/// spawn one background task that pushes `Event`s into the shared channel.
pub trait AsyncEventSource: Send + 'static {
    /// Human-readable stable identifier (used for logging / diagnostics).
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task. Implementors stop when `tx.send(..).await`
    /// returns Err (channel closed) or their input is exhausted.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source receives its own
    /// `Sender` clone; the caller keeps ownership of `tx` and should drop it before awaiting the
    /// handles during shutdown.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        // drain so a second call cannot spawn duplicates
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

// -------------------------------------------------------------------------------------------------
// Keys
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Unmodified printable character; `'\t'` normalizes to `KeyCode::Tab`.
    pub fn char(c: char) -> Self {
        Self::plain(normalize_keycode(KeyCode::Char(c)))
    }

    /// True when Ctrl, Alt or Meta is held. Such chords are left to the host.
    pub fn has_command_modifier(&self) -> bool {
        self.mods
            .intersects(KeyModifiers::CTRL | KeyModifiers::ALT | KeyModifiers::META)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

/// Fold raw control characters into their named variants.
pub fn normalize_keycode(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char('\t') => KeyCode::Tab,
        KeyCode::Char('\n') | KeyCode::Char('\r') => KeyCode::Enter,
        KeyCode::Char('\u{1b}') => KeyCode::Esc,
        other => other,
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
        const META = 0b0000_1000;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&notation::format_key(self))
    }
}
