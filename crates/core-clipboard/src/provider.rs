//! Built-in clipboard providers.

use crate::{COMMAND_TIMEOUT, ClipboardError, ClipboardProvider, Permission, PermissionKind, run_command};
use std::time::Duration;

/// No system clipboard; every query is denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryOnly;

impl ClipboardProvider for MemoryOnly {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn query(&self, _kind: PermissionKind) -> Permission {
        Permission::Denied
    }

    async fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable)
    }

    async fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// System clipboard reached through external commands, e.g.
/// `["wl-paste", "--no-newline"]` / `["wl-copy"]`.
///
/// A permission is granted exactly when its command is configured.
/// A command still running after the time limit is killed and reported as
/// [`ClipboardError::TimedOut`].
#[derive(Debug, Clone)]
pub struct ProcessClipboard {
    read: Vec<String>,
    write: Vec<String>,
    limit: Duration,
}

impl ProcessClipboard {
    pub fn new(read: Vec<String>, write: Vec<String>) -> Self {
        Self {
            read,
            write,
            limit: COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.read.is_empty() && !self.write.is_empty()
    }
}

impl ClipboardProvider for ProcessClipboard {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn query(&self, kind: PermissionKind) -> Permission {
        let argv = match kind {
            PermissionKind::Read => &self.read,
            PermissionKind::Write => &self.write,
        };
        if argv.is_empty() {
            Permission::Denied
        } else {
            Permission::Granted
        }
    }

    async fn read_text(&mut self) -> Result<String, ClipboardError> {
        run_command(&self.read, None, self.limit).await
    }

    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        run_command(&self.write, Some(text), self.limit)
            .await
            .map(|_| ())
    }
}
