//! Composite editing behaviors built from [`EditOp`] (§4.8).

use crate::error::EditError;
use crate::history::History;
use crate::op::EditOp;
use draftex_caret::{advance, next_text, recede, Caret, EditState};
use draftex_string::StringBuf;
use draftex_tree::{kinds, NodeRef};

/// Put `a` and `b` in document order. Walks forward from `a` looking for `b`; if it's never
/// found, `b` must precede `a`. O(distance between them), which is fine for a selection.
fn ordered(a: &Caret, b: &Caret) -> (Caret, Caret) {
    if NodeRef::ptr_eq(&a.node, &b.node) {
        return if a.offset <= b.offset { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) };
    }
    let mut cur = Some(a.node.clone());
    while let Some(n) = cur {
        if NodeRef::ptr_eq(&n, &b.node) {
            return (a.clone(), b.clone());
        }
        cur = next_text(&n);
    }
    (b.clone(), a.clone())
}

/// `true` if `b` sits immediately after `a` with nothing between them (`a` at its own end, `b` at
/// the start of the very next Text node) — the "adjacent" case `eraseSelection` merges instead of
/// running a full `EraseRange`.
fn adjacent(a: &Caret, b: &Caret) -> bool {
    let a_len = a.node.with_text(|t| t.len());
    a.offset == a_len && b.offset == 0 && next_text(&a.node).map(|n| NodeRef::ptr_eq(&n, &b.node)).unwrap_or(false)
}

/// Erase the current selection, dispatching by geometry (§4.8).
pub fn erase_selection(state: &mut EditState, history: &mut History) -> Result<(), EditError> {
    let anchor = state.anchor.clone().ok_or(EditError::NoSelection)?;
    let (a, b) = ordered(&state.current, &anchor);

    let op = if NodeRef::ptr_eq(&a.node, &b.node) {
        let (lo, hi) = if a.offset <= b.offset { (a.offset, b.offset) } else { (b.offset, a.offset) };
        EditOp::RemoveText { node: a.node.clone(), offset: lo, len: hi - lo }
    } else if adjacent(&a, &b) {
        EditOp::MergeText { left: a.node.clone(), right: b.node.clone() }
    } else {
        EditOp::EraseRange { start: a.clone(), end: b.clone() }
    };

    history.apply(op)?;
    state.current = Caret::new(a.node.clone(), a.offset.min(a.node.with_text(|t| t.len())));
    state.anchor = None;
    Ok(())
}

/// Extend the selection to the next character position and erase it.
pub fn erase_next(state: &mut EditState, history: &mut History) -> Result<(), EditError> {
    if state.anchor.is_none() {
        state.anchor = Some(state.current.clone());
        if let Some(c) = advance(&state.current) {
            state.current = c;
        }
    }
    erase_selection(state, history)
}

/// Extend the selection to the previous character position and erase it.
pub fn erase_prev(state: &mut EditState, history: &mut History) -> Result<(), EditError> {
    if state.anchor.is_none() {
        state.anchor = Some(state.current.clone());
        if let Some(c) = recede(&state.current) {
            state.current = c;
        }
    }
    erase_selection(state, history)
}

/// Insert a single space at the caret (§4.8).
pub fn insert_space(state: &mut EditState, history: &mut History) -> Result<(), EditError> {
    let caret = state.current.clone();
    let len = caret.node.with_text(|t| t.len());

    if caret.offset == 0 {
        return Ok(());
    }
    if caret.offset == len {
        if caret.node.space_after().is_empty() {
            history.apply(EditOp::InsertSpace { node: caret.node.clone(), space: StringBuf::from_str(" ") })?;
        }
        return Ok(());
    }

    history.apply(EditOp::SplitText { node: caret.node.clone(), offset: caret.offset, sep: StringBuf::from_str(" ") })?;
    let right = caret.node.next().expect("SplitText always creates a right sibling");
    state.current = Caret::new(right, 0);
    Ok(())
}

/// Insert `text` at the caret, first erasing any active selection.
pub fn insert_text(state: &mut EditState, history: &mut History, text: &str) -> Result<(), EditError> {
    if state.anchor.is_some() {
        erase_selection(state, history)?;
    }
    let caret = state.current.clone();
    history.apply(EditOp::InsertText { node: caret.node.clone(), offset: caret.offset, text: StringBuf::from_str(text) })?;
    state.current = Caret::new(caret.node, caret.offset + text.len());
    Ok(())
}

/// Split the enclosing paragraph at the caret. Only valid directly inside a `par` (§4.8).
pub fn break_paragraph(state: &mut EditState, history: &mut History) -> Result<(), EditError> {
    let parent = state.current.node.parent().ok_or(EditError::NotInParagraph)?;
    if !parent.is_group_kind(kinds::PAR) {
        return Err(EditError::NotInParagraph);
    }
    let caret = state.current.clone();
    history.apply(EditOp::SplitPar { node: caret.node.clone(), offset: caret.offset })?;
    let new_par = parent.next().expect("SplitPar always creates a following par");
    let first = new_par.first_child().unwrap_or(caret.node);
    state.current = Caret::new(first, 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_tree::{list, Font, Mode};

    fn text(s: &str) -> NodeRef {
        NodeRef::new_text(s, Font::text(), Mode::Text)
    }

    #[test]
    fn erase_selection_within_one_node() {
        let par = NodeRef::new_group(kinds::PAR);
        let node = text("hello world");
        list::append(&par, node.clone());

        let mut state = EditState::new(Caret::new(node.clone(), 0));
        state.anchor = Some(Caret::new(node.clone(), 6));
        let mut history = History::new();
        erase_selection(&mut state, &mut history).unwrap();

        assert_eq!(node.with_text(|t| t.as_str().to_string()), "world");
        assert!(history.undo().unwrap());
        assert_eq!(node.with_text(|t| t.as_str().to_string()), "hello world");
    }

    #[test]
    fn insert_space_at_end_is_a_no_op_when_already_followed_by_a_space() {
        let par = NodeRef::new_group(kinds::PAR);
        let node = text("hello");
        node.set_space_after(StringBuf::from_str(" "));
        list::append(&par, node.clone());

        let mut state = EditState::new(Caret::new(node.clone(), 5));
        let mut history = History::new();
        insert_space(&mut state, &mut history).unwrap();

        assert_eq!(node.with_text(|t| t.as_str().to_string()), "hello");
        assert!(!history.undo().unwrap(), "a no-op insert must not push an undo frame");
    }

    #[test]
    fn insert_text_types_a_character_and_advances_the_caret() {
        let par = NodeRef::new_group(kinds::PAR);
        let node = text("ac");
        list::append(&par, node.clone());

        let mut state = EditState::new(Caret::new(node.clone(), 1));
        let mut history = History::new();
        insert_text(&mut state, &mut history, "b").unwrap();

        assert_eq!(node.with_text(|t| t.as_str().to_string()), "abc");
        assert_eq!(state.current.offset, 2);
    }

    #[test]
    fn break_paragraph_splits_in_two() {
        let root = NodeRef::new_group(kinds::ROOT);
        let par = NodeRef::new_group(kinds::PAR);
        let node = text("helloworld");
        list::append(&par, node.clone());
        list::append(&root, par.clone());

        let mut state = EditState::new(Caret::new(node.clone(), 5));
        let mut history = History::new();
        break_paragraph(&mut state, &mut history).unwrap();

        assert_eq!(node.with_text(|t| t.as_str().to_string()), "hello");
        assert!(par.next().unwrap().is_group_kind(kinds::PAR));
    }
}
