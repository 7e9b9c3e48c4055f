//! Plain-text frame assembly.

use crate::rows::{RenderRow, render_rows};
use crate::status::{StatusContext, build_status};
use core_state::EditorState;
use std::path::Path;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameOptions<'a> {
    pub file_name: Option<&'a Path>,
    /// Draw hidden rows too (debug view).
    pub show_hidden: bool,
}

fn row_line(row: &RenderRow<'_>, out: &mut String) {
    out.push(if row.is_cursor() {
        '>'
    } else if row.is_selected() {
        '*'
    } else {
        ' '
    });
    out.push(if row.is_folded() { '+' } else { ' ' });
    out.push_str(row.text);
    out.push('\n');
}

/// Render rows, status line and open pad into one newline-terminated string.
pub fn render_frame(state: &EditorState, opts: FrameOptions<'_>) -> String {
    let rows = render_rows(state);
    let mut out = String::new();
    let mut drawn = 0usize;
    for row in rows.iter().filter(|r| opts.show_hidden || !r.is_hidden()) {
        row_line(row, &mut out);
        drawn += 1;
    }
    let status = build_status(&StatusContext {
        scope: state.cursor.scope(),
        cursor: state.cursor.line(),
        len: state.store.len(),
        file_name: opts.file_name,
        dirty: state.dirty,
        pad_open: state.pad.is_open(),
    });
    out.push_str(&status);
    out.push('\n');
    if state.pad.is_open() {
        for line in state.pad.text().lines() {
            out.push_str("| ");
            out.push_str(line);
            out.push('\n');
        }
    }
    trace!(target: "render", rows = rows.len(), drawn, "frame");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn marks_cursor_selection_and_folds() {
        let mut st = EditorState::from_text("a\n  b\n  c\nd\n  e");
        st.cursor.move_to(0, 5).unwrap();
        st.cursor.set_region(true);
        st.store.get_mut(3).unwrap().folded = true;
        st.store.get_mut(4).unwrap().hidden = true;
        let frame = render_frame(&st, FrameOptions::default());
        assert_eq!(
            frame,
            "> a\n*   b\n*   c\n +d\n[GROUP] [No Name] Ln 1/5\n"
        );
    }

    #[test]
    fn show_hidden_draws_everything() {
        let mut st = EditorState::from_text("a\n  b");
        st.store.get_mut(1).unwrap().hidden = true;
        let frame = render_frame(
            &st,
            FrameOptions {
                show_hidden: true,
                ..FrameOptions::default()
            },
        );
        assert_eq!(frame, "  a\n    b\n[OFF] [No Name] Ln -/2\n");
    }

    #[test]
    fn open_pad_is_appended() {
        let mut st = EditorState::from_text("a");
        st.pad.open("x\n  y".to_string());
        st.dirty = true;
        let frame = render_frame(
            &st,
            FrameOptions {
                file_name: Some(Path::new("o.txt")),
                ..FrameOptions::default()
            },
        );
        assert_eq!(frame, "  a\n[OFF] o.txt* Ln -/1 [PAD]\n| x\n|   y\n");
    }
}
