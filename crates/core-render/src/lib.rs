//! Row snapshots and plain-text frames for the outline view.
//!
//! Rendering never mutates editor state. `rows::render_rows` takes a
//! snapshot of every line with its display flags; `frame::render_frame`
//! turns the visible part of that snapshot, the status line and an open
//! edit pad into the text the front end prints.
//!
//! Frame layout, one line per visible row:
//! * column 0: `>` on the cursor row, `*` on a selected row, space otherwise
//! * column 1: `+` when the row is folded, space otherwise
//! * the literal line text, leading whitespace included
//!
//! Hidden rows are skipped. A status line follows the rows; when the edit
//! pad is open its lines come last, each prefixed with `| `.

pub mod frame;
pub mod rows;
pub mod status;

pub use frame::{FrameOptions, render_frame};
pub use rows::{RenderRow, RowFlags, render_rows};
pub use status::{StatusContext, StatusSegment, build_status};
