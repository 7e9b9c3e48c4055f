use core_render::{FrameOptions, render_frame, render_rows};
use core_state::EditorState;
use pretty_assertions::assert_eq;

fn collapse_tops(st: &mut EditorState) {
    let len = st.store.len();
    for line in st.store.lines_mut(0..len) {
        if line.indent() == 0 {
            line.folded = true;
        } else {
            line.hidden = true;
        }
    }
}

#[test]
fn collapsed_outline_shows_only_top_level() {
    let mut st = EditorState::from_text("alpha\n  a1\n  a2\nbeta\n  b1\n:: trailing note");
    collapse_tops(&mut st);
    st.cursor.move_to(3, st.store.len()).unwrap();
    let frame = render_frame(&st, FrameOptions::default());
    assert_eq!(
        frame,
        " +alpha\n>+beta\n +:: trailing note\n[OFF] [No Name] Ln 4/6\n"
    );
}

#[test]
fn rows_keep_ids_stable_across_snapshots() {
    let st = EditorState::from_text("a\n  b");
    let first: Vec<_> = render_rows(&st).into_iter().map(|r| r.id).collect();
    let second: Vec<_> = render_rows(&st).into_iter().map(|r| r.id).collect();
    assert_eq!(first, second);
}

#[test]
fn cursor_on_hidden_line_is_not_drawn() {
    let mut st = EditorState::from_text("a\n  b\nc");
    st.store.get_mut(1).unwrap().hidden = true;
    st.cursor.move_to(1, 3).unwrap();
    let frame = render_frame(&st, FrameOptions::default());
    assert!(!frame.contains('>'));
    assert!(frame.ends_with("Ln 2/3\n"));
}
