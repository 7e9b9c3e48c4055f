//! Internal error taxonomy for structural editing.
//!
//! None of these reach the end user. Editing commands degrade to silent
//! no-ops; the dispatcher logs the error at debug level and reports it in
//! `DispatchResult::skipped` so tests can assert *why* nothing happened.

use core_text::{LineError, LineId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// No cursor line is selected, or the stored index went stale.
    #[error("no cursor line selected")]
    InvalidCursor,
    /// Index outside the current sequence (missing neighbor included).
    #[error("index {index} out of range for {len} lines")]
    OutOfRange { index: usize, len: usize },
    /// Handle does not name a line in the store.
    #[error("unknown line {0}")]
    UnknownLine(LineId),
    #[error("malformed line: {0}")]
    MalformedLine(#[from] LineError),
    /// Preconditions hold but the operation would change nothing
    /// (no previous line to merge into, dedent at column 0, ...).
    #[error("no effect: {0}")]
    NoEffect(&'static str),
}
