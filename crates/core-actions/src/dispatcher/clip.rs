//! Removal and clipboard commands: delete, cut, copy, paste.
//!
//! Delete first reveals the lines a fold on the cursor line was hiding, so
//! deleting a folded root never leaves its children invisible. Cut leaves
//! visibility flags alone.

use super::DispatchResult;
use core_clipboard::{Clipboard, ClipboardProvider};
use core_state::{EditError, EditorState};
use tracing::debug;

fn remove_operand(state: &mut EditorState) -> Result<usize, EditError> {
    let range = state.operand()?;
    let removed = state.store.remove_indices(range)?;
    Ok(removed.len())
}

/// Un-hide the group region of the cursor line.
fn reveal_fold(state: &mut EditorState) -> Result<(), EditError> {
    let index = state.cursor_index()?;
    let fold_region = state.region_at(index);
    for line in state.store.lines_mut(fold_region) {
        line.hidden = false;
    }
    Ok(())
}

pub(super) fn delete(state: &mut EditorState) -> Result<DispatchResult, EditError> {
    reveal_fold(state)?;
    let removed = remove_operand(state)?;
    state.cursor.clear();
    debug!(target: "actions.dispatch", op = "delete", removed, "removed");
    Ok(DispatchResult::structural())
}

pub(super) async fn cut<P: ClipboardProvider>(
    state: &mut EditorState,
    clipboard: &mut Clipboard<P>,
) -> Result<DispatchResult, EditError> {
    let text = state.operand_text()?;
    clipboard.write_text(text).await;
    let removed = remove_operand(state)?;
    state.clamp_cursor();
    state.cursor.set_region(false);
    debug!(target: "actions.dispatch", op = "cut", removed, "removed");
    Ok(DispatchResult::structural())
}

pub(super) async fn copy<P: ClipboardProvider>(
    state: &mut EditorState,
    clipboard: &mut Clipboard<P>,
) -> Result<DispatchResult, EditError> {
    let text = state.operand_text()?;
    clipboard.write_text(text).await;
    Ok(DispatchResult::clean())
}

/// Insert the clipboard lines before the cursor line. The cursor keeps its
/// index, so it ends up on the first pasted line.
pub(super) async fn paste<P: ClipboardProvider>(
    state: &mut EditorState,
    clipboard: &mut Clipboard<P>,
) -> Result<DispatchResult, EditError> {
    let index = state.cursor_index()?;
    let text = clipboard.read_text().await;
    let lines = state.store.parse(&text);
    if lines.is_empty() {
        return Err(EditError::NoEffect("clipboard empty"));
    }
    let count = lines.len();
    state.store.insert_at(index, lines)?;
    debug!(target: "actions.dispatch", op = "paste", index, count, "inserted");
    Ok(DispatchResult::structural())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str, index: usize) -> EditorState {
        let mut st = EditorState::from_text(raw);
        st.cursor.move_to(index, st.store.len()).unwrap();
        st
    }

    #[test]
    fn delete_clears_cursor_and_region_mode() {
        let mut st = at("a\n  b\nc", 0);
        st.cursor.set_region(true);
        delete(&mut st).unwrap();
        assert_eq!(st.serialize(), "c");
        assert_eq!(st.cursor.line(), None);
        assert!(!st.cursor.region_active());
    }

    #[test]
    fn delete_reveals_children_of_folded_line() {
        let mut st = at("a\n  b\n  c\nd", 0);
        st.store.get_mut(0).unwrap().folded = true;
        st.store.get_mut(1).unwrap().hidden = true;
        st.store.get_mut(2).unwrap().hidden = true;
        delete(&mut st).unwrap();
        assert_eq!(st.serialize(), "  b\n  c\nd");
        assert!(st.store.iter().all(|l| !l.hidden));
    }

    #[test]
    fn delete_without_cursor_is_skipped() {
        let mut st = EditorState::from_text("a");
        assert_eq!(delete(&mut st), Err(EditError::InvalidCursor));
        assert_eq!(st.store.len(), 1);
    }

    #[tokio::test]
    async fn cut_last_line_clamps_cursor() {
        let mut st = at("a\nb\nc", 2);
        let mut cb = Clipboard::memory();
        cut(&mut st, &mut cb).await.unwrap();
        assert_eq!(cb.fallback(), "c");
        assert_eq!(st.cursor.line(), Some(1));
    }

    #[tokio::test]
    async fn cut_leaves_hidden_flags_alone() {
        // "b" is hidden by an earlier fold; cutting the root above it
        // does not make it visible.
        let mut st = at("a\n  b\n  c\nd", 0);
        st.store.get_mut(1).unwrap().hidden = true;
        let mut cb = Clipboard::memory();
        cut(&mut st, &mut cb).await.unwrap();
        assert_eq!(cb.fallback(), "a");
        assert_eq!(st.serialize(), "  b\n  c\nd");
        let hidden: Vec<bool> = st.store.iter().map(|l| l.hidden).collect();
        assert_eq!(hidden, vec![true, false, false]);
    }

    #[tokio::test]
    async fn cut_only_line_unsets_cursor() {
        let mut st = at("a", 0);
        let mut cb = Clipboard::memory();
        cut(&mut st, &mut cb).await.unwrap();
        assert!(st.store.is_empty());
        assert_eq!(st.cursor.line(), None);
    }

    #[tokio::test]
    async fn copy_leaves_document_alone() {
        let mut st = at("a\n  b\nc", 0);
        st.cursor.set_region(true);
        let mut cb = Clipboard::memory();
        let res = copy(&mut st, &mut cb).await.unwrap();
        assert!(!res.dirty);
        assert_eq!(cb.fallback(), "a\n  b");
        assert_eq!(st.serialize(), "a\n  b\nc");
    }

    #[tokio::test]
    async fn paste_empty_clipboard_is_no_effect() {
        let mut st = at("a", 0);
        let mut cb = Clipboard::memory();
        assert_eq!(
            paste(&mut st, &mut cb).await,
            Err(EditError::NoEffect("clipboard empty"))
        );
    }

    #[tokio::test]
    async fn paste_inserts_before_cursor() {
        let mut st = at("a\nb", 1);
        let mut cb = Clipboard::memory();
        cb.write_text("x\n  y".into()).await;
        paste(&mut st, &mut cb).await.unwrap();
        assert_eq!(st.serialize(), "a\nx\n  y\nb");
        assert_eq!(st.cursor.line(), Some(1));
    }
}
