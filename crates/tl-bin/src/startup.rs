//! Process setup: CLI arguments, logging, panic hook, document and
//! clipboard bootstrap.

use anyhow::Result;
use clap::Parser;
use core_clipboard::{Clipboard, ProcessClipboard};
use core_config::Config;
use core_state::EditorState;
use core_text::{TextCodec, normalize_line_endings};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "treeline.log";

/// Shown when no file is given on the command line.
pub(crate) const WELCOME: &str = "\
treeline
  j / k move down / up
  J / K swap the line down / up
  H / L dedent / indent
  space toggles the region under the cursor
  Tab folds, :foldTops collapses to top-level lines
  d delete, x cut, c copy, v paste, m merge
:: :q quits, :dump prints the outline";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "treeline", version, about = "Indentation outline editor")]
pub(crate) struct Args {
    /// Outline to open (UTF-8 text). A welcome outline is used when omitted.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `treeline.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Apply this key sequence, print the frame and exit without reading stdin.
    #[arg(long = "keys")]
    pub keys: Option<String>,
    /// Print the serialized outline on exit.
    #[arg(long = "dump")]
    pub dump: bool,
}

/// Install the file logger. The returned guard flushes the writer on drop.
pub(crate) fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

pub(crate) fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

pub(crate) struct Document {
    pub state: EditorState,
    pub path: Option<PathBuf>,
    pub open_failed: bool,
}

/// Read `path` into editor state. An unreadable file is logged and yields an
/// empty outline; no path yields the welcome outline.
pub(crate) fn load_document(path: Option<&Path>, codec: TextCodec) -> Document {
    let Some(path) = path else {
        return Document {
            state: EditorState::from_text_with(codec, WELCOME),
            path: None,
            open_failed: false,
        };
    };
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let norm = normalize_line_endings(&content);
            if norm.mixed {
                warn!(target: "io", file = %path.display(), "mixed_line_endings_detected");
            }
            let state = EditorState::from_text_with(codec, &norm.normalized);
            debug!(
                target: "io",
                file = %path.display(),
                size_bytes = content.len(),
                line_ending = ?norm.original,
                lines = state.store.len(),
                "file_read_ok"
            );
            Document {
                state,
                path: Some(path.to_path_buf()),
                open_failed: false,
            }
        }
        Err(e) => {
            error!(target: "io", file = %path.display(), ?e, "file_open_error");
            Document {
                state: EditorState::from_text_with(codec, ""),
                path: Some(path.to_path_buf()),
                open_failed: true,
            }
        }
    }
}

/// System clipboard through the configured commands; in-memory only when
/// none are configured.
pub(crate) fn build_clipboard(config: &Config) -> Clipboard<ProcessClipboard> {
    let cfg = &config.file.clipboard;
    let provider = ProcessClipboard::new(cfg.read.clone(), cfg.write.clone());
    info!(target: "clipboard", system = provider.is_configured(), "clipboard_ready");
    Clipboard::new(provider)
}

pub(crate) fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = core_config::load_from(path)?;
    info!(
        target: "runtime.startup",
        path = config.path.as_ref().map(|p| p.display().to_string()).as_deref(),
        ternary = config.ternary_region(),
        "config_ready"
    );
    Ok(config)
}
