//! Capability-gated clipboard with an in-memory fallback.
//!
//! Every read or write first asks the provider for both the read and the
//! write permission. Only when both come back `Granted` is the system
//! clipboard touched; `Denied`, `Prompt`, or a provider error all route to
//! the process-local buffer. Failures are logged (target `clipboard`) and
//! never surfaced to the caller: a copy always "succeeds" and a paste
//! always yields some text (possibly empty).
//!
//! The fallback buffer mirrors every write, so a system read that fails
//! after a successful system write still returns the last copied text.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

mod provider;

pub use provider::{MemoryOnly, ProcessClipboard};

/// Answer to a permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user has not decided yet. Treated as not granted.
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    Read,
    Write,
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("system clipboard unavailable")]
    Unavailable,
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("`{program}` did not finish within {after:?}")]
    TimedOut { program: String, after: Duration },
    #[error("clipboard io: {0}")]
    Io(#[from] std::io::Error),
}

/// Access to a system clipboard.
#[allow(async_fn_in_trait)]
pub trait ClipboardProvider {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;
    async fn query(&self, kind: PermissionKind) -> Permission;
    async fn read_text(&mut self) -> Result<String, ClipboardError>;
    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Single process-wide clipboard slot.
#[derive(Debug, Default)]
pub struct Clipboard<P> {
    provider: P,
    fallback: String,
}

impl Clipboard<MemoryOnly> {
    /// Clipboard that never leaves the process.
    pub fn memory() -> Self {
        Self::new(MemoryOnly)
    }
}

impl<P: ClipboardProvider> Clipboard<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            fallback: String::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Contents of the in-memory slot.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Both read and write must be granted before the system clipboard is used.
    pub async fn system_allowed(&self) -> bool {
        let read = self.provider.query(PermissionKind::Read).await;
        let write = self.provider.query(PermissionKind::Write).await;
        let allowed = read == Permission::Granted && write == Permission::Granted;
        debug!(target: "clipboard", provider = self.provider.name(), ?read, ?write, allowed, "permission");
        allowed
    }

    pub async fn write_text(&mut self, text: String) {
        if self.system_allowed().await {
            if let Err(err) = self.provider.write_text(&text).await {
                warn!(target: "clipboard", provider = self.provider.name(), error = %err, "system write failed; using memory slot");
            }
        }
        debug!(target: "clipboard", bytes = text.len(), "write");
        self.fallback = text;
    }

    pub async fn read_text(&mut self) -> String {
        if self.system_allowed().await {
            match self.provider.read_text().await {
                Ok(text) => return text,
                Err(err) => {
                    warn!(target: "clipboard", provider = self.provider.name(), error = %err, "system read failed; using memory slot");
                }
            }
        }
        self.fallback.clone()
    }
}

/// How long a clipboard command may run before it is abandoned.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Run `argv`. With `input` the text is fed on stdin and output is
/// discarded, since copy tools that fork keep an inherited pipe open.
/// Without it stdout is captured and returned.
pub(crate) async fn run_command(
    argv: &[String],
    input: Option<&str>,
    limit: Duration,
) -> Result<String, ClipboardError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(ClipboardError::Unavailable);
    };
    let mut cmd = Command::new(program);
    cmd.args(args).kill_on_drop(true);
    if input.is_some() {
        cmd.stdin(Stdio::piped()).stdout(Stdio::null()).stderr(Stdio::null());
    } else {
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    }
    let mut child = cmd.spawn().map_err(|source| ClipboardError::Spawn {
        program: program.clone(),
        source,
    })?;
    let timed_out = || ClipboardError::TimedOut {
        program: program.clone(),
        after: limit,
    };

    if let Some(text) = input {
        if let Some(mut stdin) = child.stdin.take() {
            timeout(limit, stdin.write_all(text.as_bytes()))
                .await
                .map_err(|_| timed_out())??;
            // dropping stdin closes the pipe so the command sees EOF
        }
        let status = timeout(limit, child.wait()).await.map_err(|_| timed_out())??;
        if !status.success() {
            return Err(ClipboardError::CommandFailed {
                program: program.clone(),
                status: status.to_string(),
                stderr: String::new(),
            });
        }
        return Ok(String::new());
    }

    let output = timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| timed_out())??;
    if !output.status.success() {
        return Err(ClipboardError::CommandFailed {
            program: program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider with scripted permissions and an inspectable system buffer.
    #[derive(Default)]
    struct Scripted {
        read: Option<Permission>,
        write: Option<Permission>,
        fail: bool,
        system: String,
        writes: usize,
    }

    impl Scripted {
        fn granted() -> Self {
            Self {
                read: Some(Permission::Granted),
                write: Some(Permission::Granted),
                ..Self::default()
            }
        }
    }

    impl ClipboardProvider for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }
        async fn query(&self, kind: PermissionKind) -> Permission {
            let p = match kind {
                PermissionKind::Read => self.read,
                PermissionKind::Write => self.write,
            };
            p.unwrap_or(Permission::Denied)
        }
        async fn read_text(&mut self) -> Result<String, ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable);
            }
            Ok(self.system.clone())
        }
        async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable);
            }
            self.writes += 1;
            self.system = text.to_string();
            Ok(())
        }
    }

    #[tokio::test]
    async fn granted_uses_system_clipboard() {
        let mut cb = Clipboard::new(Scripted::granted());
        cb.write_text("abc".into()).await;
        assert_eq!(cb.provider().writes, 1);
        assert_eq!(cb.provider().system, "abc");
        cb.provider.system = "from elsewhere".into();
        assert_eq!(cb.read_text().await, "from elsewhere");
    }

    #[tokio::test]
    async fn prompt_or_denied_uses_memory() {
        for (read, write) in [
            (Permission::Prompt, Permission::Granted),
            (Permission::Granted, Permission::Denied),
            (Permission::Denied, Permission::Denied),
        ] {
            let mut cb = Clipboard::new(Scripted {
                read: Some(read),
                write: Some(write),
                ..Scripted::default()
            });
            cb.write_text("local".into()).await;
            assert_eq!(cb.provider().writes, 0);
            assert_eq!(cb.read_text().await, "local");
        }
    }

    #[tokio::test]
    async fn system_errors_fall_back() {
        let mut cb = Clipboard::new(Scripted {
            fail: true,
            ..Scripted::granted()
        });
        cb.write_text("kept".into()).await;
        assert_eq!(cb.fallback(), "kept");
        assert_eq!(cb.read_text().await, "kept");
    }

    #[tokio::test]
    async fn memory_clipboard_starts_empty() {
        let mut cb = Clipboard::memory();
        assert!(!cb.system_allowed().await);
        assert_eq!(cb.read_text().await, "");
        cb.write_text("x".into()).await;
        assert_eq!(cb.read_text().await, "x");
    }

    #[tokio::test]
    async fn empty_command_is_unavailable() {
        let err = run_command(&[], None, COMMAND_TIMEOUT).await.unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable));
    }
}
