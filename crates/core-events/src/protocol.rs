//! Line-oriented input protocol.
//!
//! Each input line becomes zero or more events:
//! * `:q` / `:quit`       -> quit
//! * `:dump`              -> print the serialized document
//! * `:select N`          -> click line N
//! * `:pad TEXT`          -> set edit pad text (`\n`, `\t`, `\\` escapes)
//! * `:NAME`              -> run command NAME
//! * anything else        -> key sequence in angle-bracket notation, then
//!   `KeysEnd` so a pending ambiguous sequence resolves at the line break
//!
//! Malformed lines are logged and dropped; the reader keeps going.

use crate::{AsyncEventSource, CommandEvent, Event, InputEvent, parse_key_sequence};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub fn decode_line(line: &str) -> Vec<Event> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Vec::new();
    }
    if let Some(cmd) = line.strip_prefix(':') {
        return decode_command(cmd).into_iter().collect();
    }
    match parse_key_sequence(line) {
        Ok(keys) => keys
            .into_iter()
            .map(|k| Event::Input(InputEvent::Key(k)))
            .chain(std::iter::once(Event::Input(InputEvent::KeysEnd)))
            .collect(),
        Err(err) => {
            warn!(target: "input.map", %err, "undecodable key line");
            Vec::new()
        }
    }
}

fn decode_command(cmd: &str) -> Option<Event> {
    let (name, arg) = match cmd.split_once(' ') {
        Some((name, arg)) => (name, arg),
        None => (cmd.trim(), ""),
    };
    let event = match name {
        "" => return None,
        "q" | "quit" => Event::Command(CommandEvent::Quit),
        "dump" => Event::Command(CommandEvent::Dump),
        "select" => match arg.trim().parse() {
            Ok(index) => Event::Input(InputEvent::Click(index)),
            Err(_) => {
                warn!(target: "input.map", arg, "select expects a line index");
                return None;
            }
        },
        "pad" => Event::Input(InputEvent::PadText(unescape(arg))),
        other => Event::Command(CommandEvent::Named(other.to_string())),
    };
    Some(event)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Event source reading protocol lines from any async reader.
///
/// Emits `Event::Shutdown` when the input ends so piped scripts terminate.
pub struct LineSource<R> {
    reader: R,
}

impl LineSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> LineSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> AsyncEventSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn name(&self) -> &'static str {
        "lines"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let mut lines = self.reader.lines();
        tokio::spawn(async move {
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        for event in decode_line(&line) {
                            if tx.send(event).await.is_err() {
                                debug!(target: "runtime.events", "consumer gone; line reader exiting");
                                return;
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!(target: "runtime.events", %err, "input read failed");
                        break;
                    }
                }
            }
            let _ = tx.send(Event::Shutdown).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventSourceRegistry, KeyCode, KeyEvent, event_channel};

    fn key(c: char) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::char(c)))
    }

    const END: Event = Event::Input(InputEvent::KeysEnd);

    #[test]
    fn plain_line_is_keys() {
        assert_eq!(decode_line("jK"), vec![key('j'), key('K'), END]);
        assert_eq!(
            decode_line("<Tab>\r\n"),
            vec![
                Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Tab))),
                END
            ]
        );
        assert!(decode_line("").is_empty());
    }

    #[test]
    fn commands() {
        assert_eq!(decode_line(":q"), vec![Event::Command(CommandEvent::Quit)]);
        assert_eq!(decode_line(":dump"), vec![Event::Command(CommandEvent::Dump)]);
        assert_eq!(
            decode_line(":foldTops"),
            vec![Event::Command(CommandEvent::Named("foldTops".into()))]
        );
        assert_eq!(
            decode_line(":select 3"),
            vec![Event::Input(InputEvent::Click(3))]
        );
        assert!(decode_line(":select x").is_empty());
        assert!(decode_line(":").is_empty());
    }

    #[test]
    fn pad_text_unescapes() {
        assert_eq!(
            decode_line(r":pad a\n  b\\c"),
            vec![Event::Input(InputEvent::PadText("a\n  b\\c".into()))]
        );
    }

    #[test]
    fn bad_key_line_is_dropped() {
        assert!(decode_line("<Nope>").is_empty());
    }

    #[tokio::test]
    async fn line_source_streams_then_shuts_down() {
        let (tx, mut rx) = event_channel();
        let mut reg = EventSourceRegistry::new();
        reg.register(LineSource::new(&b"j\n:q\n"[..]));
        let handles = reg.spawn_all(&tx);
        drop(tx);
        let mut got = Vec::new();
        while let Some(ev) = rx.recv().await {
            got.push(ev);
        }
        assert_eq!(
            got,
            vec![
                key('j'),
                END,
                Event::Command(CommandEvent::Quit),
                Event::Shutdown
            ]
        );
        for h in handles {
            h.await.expect("reader exits");
        }
    }
}
