//! Event loop driving the editor core.
//!
//! The loop is the single consumer of the event channel and the only code
//! that mutates `EditorState`. Keys go through the `KeyTranslator`; every
//! resulting action is dispatched to completion before the next event is
//! taken. A frame is printed once per input line (or per command) when
//! something visible changed.

use anyhow::Result;
use core_actions::{Action, ActionObserver, KeyTranslator, dispatch};
use core_clipboard::{Clipboard, ClipboardProvider};
use core_events::{CommandEvent, Event, InputEvent, parse_key_sequence};
use core_render::{FrameOptions, render_frame};
use core_state::EditorState;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownReason {
    CommandQuit,
    ActionQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Break(ShutdownReason),
}

/// Logs every action before it runs.
pub(crate) struct TraceObserver;

impl ActionObserver for TraceObserver {
    fn on_action(&self, action: &Action) {
        trace!(target: "actions.observer", action = action.name(), "action");
    }
}

pub(crate) struct Runtime<P, W> {
    state: EditorState,
    clipboard: Clipboard<P>,
    translator: KeyTranslator,
    observers: Vec<Box<dyn ActionObserver>>,
    /// `cycleRegion` is only honored in ternary region mode.
    ternary: bool,
    file_name: Option<PathBuf>,
    out: W,
    render_pending: bool,
}

impl<P: ClipboardProvider, W: Write> Runtime<P, W> {
    pub(crate) fn new(
        state: EditorState,
        clipboard: Clipboard<P>,
        translator: KeyTranslator,
        ternary: bool,
        file_name: Option<PathBuf>,
        out: W,
    ) -> Self {
        Self {
            state,
            clipboard,
            translator,
            observers: Vec::new(),
            ternary,
            file_name,
            out,
            render_pending: false,
        }
    }

    pub(crate) fn add_observer(&mut self, observer: Box<dyn ActionObserver>) {
        self.observers.push(observer);
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &EditorState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn out(&self) -> &W {
        &self.out
    }

    pub(crate) fn render(&mut self) -> Result<()> {
        let frame = render_frame(
            &self.state,
            FrameOptions {
                file_name: self.file_name.as_deref(),
                show_hidden: false,
            },
        );
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.render_pending = false;
        Ok(())
    }

    pub(crate) fn dump(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.state.serialize())?;
        self.out.flush()?;
        Ok(())
    }

    /// Consume events until quit, shutdown or channel close.
    pub(crate) async fn run(&mut self, rx: &mut Receiver<Event>) -> Result<ShutdownReason> {
        self.render()?;
        while let Some(event) = rx.recv().await {
            if let LoopControl::Break(reason) = self.handle_event(event).await? {
                info!(target: "runtime.shutdown", reason = reason.as_str(), "loop_exit");
                return Ok(reason);
            }
        }
        info!(target: "runtime.shutdown", reason = ShutdownReason::ChannelClosed.as_str(), "loop_exit");
        Ok(ShutdownReason::ChannelClosed)
    }

    /// Apply `keys` (angle-bracket notation) in one go, then print the frame.
    pub(crate) async fn run_script(&mut self, keys: &str) -> Result<()> {
        let keys = parse_key_sequence(keys)?;
        for key in &keys {
            let actions = self.translator.translate(key);
            if self.apply(actions).await != LoopControl::Continue {
                break;
            }
        }
        let rest = self.translator.flush();
        self.apply(rest).await;
        self.render()
    }

    async fn handle_event(&mut self, event: Event) -> Result<LoopControl> {
        let mut control = LoopControl::Continue;
        let mut line_done = true;
        match event {
            Event::Input(InputEvent::Key(key)) => {
                let actions = self.translator.translate(&key);
                control = self.apply(actions).await;
                line_done = false;
            }
            Event::Input(InputEvent::KeysEnd) => {
                let actions = self.translator.flush();
                control = self.apply(actions).await;
            }
            Event::Input(InputEvent::Click(index)) => {
                control = self.apply(vec![Action::Select(index)]).await;
            }
            Event::Input(InputEvent::PadText(text)) => {
                control = self.apply(vec![Action::PadInput(text)]).await;
            }
            Event::Command(CommandEvent::Quit) => {
                control = LoopControl::Break(ShutdownReason::CommandQuit);
            }
            Event::Command(CommandEvent::Dump) => self.dump()?,
            Event::Command(CommandEvent::Named(name)) => {
                if let Some(action) = self.named_action(&name) {
                    control = self.apply(vec![action]).await;
                }
            }
            Event::Shutdown => control = LoopControl::Break(ShutdownReason::ShutdownEvent),
        }
        if line_done && self.render_pending && control == LoopControl::Continue {
            self.render()?;
        }
        Ok(control)
    }

    fn named_action(&self, name: &str) -> Option<Action> {
        match name.parse::<Action>() {
            Ok(action) => Some(action),
            Err(e) => {
                warn!(target: "input.map", %e, "unknown_command");
                None
            }
        }
    }

    async fn apply(&mut self, actions: Vec<Action>) -> LoopControl {
        for action in actions {
            if matches!(action, Action::CycleRegion) && !self.ternary {
                debug!(target: "input.map", "cycle_region_requires_ternary_mode");
                continue;
            }
            let result = dispatch(action, &mut self.state, &mut self.clipboard, &self.observers).await;
            if result.dirty {
                self.render_pending = true;
            }
            if result.quit {
                return LoopControl::Break(ShutdownReason::ActionQuit);
            }
        }
        LoopControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_clipboard::MemoryOnly;
    use core_events::{decode_line, event_channel};
    use core_state::RegionScope;
    use pretty_assertions::assert_eq;

    fn runtime(raw: &str, ternary: bool) -> Runtime<MemoryOnly, Vec<u8>> {
        Runtime::new(
            EditorState::from_text(raw),
            Clipboard::memory(),
            KeyTranslator::default(),
            ternary,
            None,
            Vec::new(),
        )
    }

    fn printed(rt: &Runtime<MemoryOnly, Vec<u8>>) -> String {
        String::from_utf8(rt.out().clone()).unwrap()
    }

    async fn feed(rt: &mut Runtime<MemoryOnly, Vec<u8>>, lines: &[&str]) -> ShutdownReason {
        let (tx, mut rx) = event_channel();
        for line in lines {
            for ev in decode_line(line) {
                tx.send(ev).await.unwrap();
            }
        }
        drop(tx);
        rt.run(&mut rx).await.unwrap()
    }

    #[tokio::test]
    async fn script_folds_and_prints_frame() {
        let mut rt = runtime("a\n  b\nc", false);
        rt.run_script("j<Tab>").await.unwrap();
        assert_eq!(printed(&rt), ">+a\n  c\n[OFF] [No Name] Ln 1/3\n");
    }

    #[tokio::test]
    async fn event_stream_renders_once_per_line() {
        let mut rt = runtime("a\nb\nc", false);
        let reason = feed(&mut rt, &["jj", ":q", "j"]).await;
        assert_eq!(reason, ShutdownReason::CommandQuit);
        assert_eq!(rt.state().cursor.line(), Some(1));
        let frames = printed(&rt).matches("[OFF]").count();
        // initial frame plus one for the key line
        assert_eq!(frames, 2);
    }

    #[tokio::test]
    async fn channel_close_ends_loop() {
        let mut rt = runtime("a", false);
        assert_eq!(feed(&mut rt, &["j"]).await, ShutdownReason::ChannelClosed);
    }

    #[tokio::test]
    async fn named_commands_and_dump() {
        let mut rt = runtime("a\n  b\nc\n  d", false);
        feed(&mut rt, &[":foldTops", ":dump"]).await;
        assert!(rt.state().store.iter().all(|l| l.indent() == 0 || l.hidden));
        assert!(printed(&rt).contains("a\n  b\nc\n  d\n"));
    }

    #[tokio::test]
    async fn cycle_region_needs_ternary_mode() {
        let mut rt = runtime("a\nb", false);
        feed(&mut rt, &["j", ":cycleRegion"]).await;
        assert_eq!(rt.state().cursor.scope(), RegionScope::Off);

        let mut rt = runtime("a\nb", true);
        feed(&mut rt, &["j", ":cycleRegion", ":cycleRegion"]).await;
        assert_eq!(rt.state().cursor.scope(), RegionScope::Extended);
    }

    #[tokio::test]
    async fn unknown_command_is_ignored() {
        let mut rt = runtime("a", false);
        let reason = feed(&mut rt, &[":frobnicate", ":q"]).await;
        assert_eq!(reason, ShutdownReason::CommandQuit);
        assert_eq!(rt.state().serialize(), "a");
    }

    #[tokio::test]
    async fn quit_action_stops_dispatching() {
        let mut rt = runtime("a\nb", false);
        let control = rt.apply(vec![Action::Quit, Action::Down]).await;
        assert_eq!(control, LoopControl::Break(ShutdownReason::ActionQuit));
        assert_eq!(rt.state().cursor.line(), None);
    }

    #[tokio::test]
    async fn click_pad_and_save_flow() {
        let mut rt = runtime("a\nb", false);
        feed(&mut rt, &[":select 1", ":edit", r":pad b1\n  b2", ":save"]).await;
        assert_eq!(rt.state().serialize(), "a\nb1\n  b2");
        assert!(printed(&rt).contains("[OFF] [No Name]* Ln 2/3"));
    }
}
