mod common;
use common::*;

use core_actions::Action;
use core_state::EditError;

#[tokio::test]
async fn nested_region_under_cursor() {
    let mut h = Harness::new("a\n  b\n  c\nd");
    h.keys("j ").await;
    assert_eq!(h.state.cursor.line(), Some(0));
    let region: Vec<&str> = h.state.store.texts(h.state.region());
    assert_eq!(region, vec!["  b", "  c"]);
}

#[tokio::test]
async fn flat_region_under_cursor() {
    let mut h = Harness::new("a\nb\nc");
    h.keys("j ").await;
    let region: Vec<&str> = h.state.store.texts(h.state.region());
    assert_eq!(region, vec!["b", "c"]);
}

#[tokio::test]
async fn indent_then_dedent_round_trips() {
    let mut h = Harness::at("a\nb", 1);
    h.keys("L").await;
    assert_eq!(h.texts(), vec!["a", "  b"]);
    h.keys("H").await;
    assert_eq!(h.texts(), vec!["a", "b"]);
    assert_eq!(h.state.cursor.line(), Some(1));
}

#[tokio::test]
async fn cut_last_line() {
    let mut h = Harness::at("a\nb\nc", 2);
    let res = h.keys("x").await;
    assert!(res[0].structural);
    assert_eq!(h.texts(), vec!["a", "b"]);
    assert_eq!(h.state.cursor.line(), Some(1));
    assert_eq!(h.clipboard.fallback(), "c");
}

#[tokio::test]
async fn merge_into_previous() {
    let mut h = Harness::at("a\nb", 1);
    h.keys("m").await;
    assert_eq!(h.texts(), vec!["a  b"]);
    assert_eq!(h.state.cursor.line(), Some(0));
}

#[tokio::test]
async fn cut_region_and_paste_elsewhere() {
    let mut h = Harness::at("a\n  a1\n  a2\nb\nc", 0);
    h.keys(" x").await;
    assert_eq!(h.texts(), vec!["b", "c"]);
    assert!(!h.state.cursor.region_active());
    // cursor stayed on index 0 ("b"); move to "c" and paste above it
    h.keys("jv").await;
    assert_eq!(h.texts(), vec!["b", "a", "  a1", "  a2", "c"]);
    assert_eq!(h.state.cursor.line(), Some(1));
}

#[tokio::test]
async fn copy_then_paste_duplicates() {
    let mut h = Harness::at("a\nb", 1);
    h.keys("cv").await;
    assert_eq!(h.texts(), vec!["a", "b", "b"]);
}

#[tokio::test]
async fn delete_with_region_then_commands_skip() {
    let mut h = Harness::at("a\n  b\nc", 0);
    h.keys(" d").await;
    assert_eq!(h.texts(), vec!["c"]);
    assert_eq!(h.state.cursor.line(), None);
    let res = h.keys("L").await;
    assert_eq!(res[0].skipped, Some(EditError::InvalidCursor));
    assert_eq!(h.texts(), vec!["c"]);
}

#[tokio::test]
async fn fold_twice_restores_visibility() {
    let mut h = Harness::at("a\n  b\n    c\n  d\ne", 0);
    h.keys("<Tab>").await;
    let hidden: Vec<bool> = h.state.store.iter().map(|l| l.hidden).collect();
    assert_eq!(hidden, vec![false, true, true, true, false]);
    h.keys("<Tab>").await;
    assert!(h.state.store.iter().all(|l| !l.hidden && !l.folded));
}

#[tokio::test]
async fn swap_keys_move_line() {
    let mut h = Harness::at("a\nb\nc", 0);
    h.keys("JJ").await;
    assert_eq!(h.texts(), vec!["b", "c", "a"]);
    assert_eq!(h.state.cursor.line(), Some(2));
    h.keys("K").await;
    assert_eq!(h.texts(), vec!["b", "a", "c"]);
}

#[tokio::test]
async fn edit_pad_save_flow() {
    let mut h = Harness::at("a\n  b\nc", 0);
    h.keys(" ").await;
    h.run(Action::Edit).await;
    assert_eq!(h.state.pad.text(), "a\n  b");
    h.run(Action::PadInput("x\n  y\n  z".into())).await;
    let res = h.run(Action::Save).await;
    assert!(res.structural);
    assert_eq!(h.texts(), vec!["x", "  y", "  z", "c"]);
    assert!(!h.state.pad.is_open());
}

#[tokio::test]
async fn open_pad_holds_off_other_commands() {
    let mut h = Harness::at("a\nb\nc", 0);
    h.run(Action::Edit).await;
    let res = h.run(Action::Cut).await;
    assert!(!res.structural);
    assert_eq!(res.skipped, Some(EditError::NoEffect("edit pad open")));
    let res = h.keys("L").await;
    assert_eq!(res[0].skipped, Some(EditError::NoEffect("edit pad open")));
    assert_eq!(h.texts(), vec!["a", "b", "c"]);
    assert_eq!(h.clipboard.fallback(), "");

    h.run(Action::Save).await;
    assert_eq!(h.texts(), vec!["a", "b", "c"]);
    assert!(!h.state.pad.is_open());
}

#[tokio::test]
async fn moving_closes_pad_and_frees_commands() {
    let mut h = Harness::at("a\nb\nc", 0);
    h.run(Action::Edit).await;
    h.keys("j").await;
    assert!(!h.state.pad.is_open());
    assert_eq!(h.state.cursor.line(), Some(1));
    h.keys("x").await;
    assert_eq!(h.texts(), vec!["a", "c"]);
    assert_eq!(h.clipboard.fallback(), "b");
}

#[tokio::test]
async fn cursor_always_valid_after_shrinking_commands() {
    let mut h = Harness::new("a\n  b\nc\n  d\ne");
    for seq in ["jjjjx", "x", "kx", "jm", "x", "x", "x"] {
        h.keys(seq).await;
        let len = h.state.store.len();
        if let Some(i) = h.state.cursor.line() {
            assert!(i < len, "cursor {i} out of {len} after {seq}");
        }
    }
    assert!(h.state.store.is_empty());
    assert_eq!(h.state.cursor.line(), None);
}
