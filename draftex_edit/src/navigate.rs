//! Navigation wrappers around `draftex_caret::EditState` that perform the one caret-triggered
//! mutation the spec describes (§4.7, L3): a redundant empty Text node left behind by crossing
//! out of it is removed via `RemoveNode`, so undo restores it.
//!
//! `draftex_caret` only exposes the pure check (`elision_candidate`) since it never mutates the
//! tree; this is the one place that check is actually acted on.

use crate::error::EditError;
use crate::history::History;
use crate::op::EditOp;
use draftex_caret::{elision_candidate, EditState};
use draftex_tree::NodeRef;

/// `EditState::advance`, eliding the Text node stepped away from if it's now redundant. Returns
/// `true` if an elision mutated the tree (callers that relayout on mutation need this).
pub fn advance(state: &mut EditState, history: &mut History) -> Result<bool, EditError> {
    let from = state.current.node.clone();
    state.advance();
    elide_if_left_behind(&from, &state.current.node, history)
}

/// Mirror of [`advance`].
pub fn recede(state: &mut EditState, history: &mut History) -> Result<bool, EditError> {
    let from = state.current.node.clone();
    state.recede();
    elide_if_left_behind(&from, &state.current.node, history)
}

fn elide_if_left_behind(from: &NodeRef, to: &NodeRef, history: &mut History) -> Result<bool, EditError> {
    if NodeRef::ptr_eq(from, to) || !elision_candidate(from) {
        return Ok(false);
    }
    history.apply(EditOp::RemoveNode { node: from.clone() })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_caret::Caret;
    use draftex_tree::{kinds, list, Font, Mode};

    #[test]
    fn advancing_past_an_empty_text_node_elides_it() {
        let par = NodeRef::new_group(kinds::PAR);
        let empty = NodeRef::new_text("", Font::text(), Mode::Text);
        let world = NodeRef::new_text("world", Font::text(), Mode::Text);
        list::append(&par, empty.clone());
        list::append(&par, world.clone());

        let mut state = EditState::new(Caret::new(empty.clone(), 0));
        let mut history = History::new();
        let mutated = advance(&mut state, &mut history).unwrap();

        assert!(mutated);
        assert!(empty.parent().is_none());
        assert!(NodeRef::ptr_eq(&state.current.node, &world));
    }

    #[test]
    fn undo_restores_the_elided_node() {
        let par = NodeRef::new_group(kinds::PAR);
        let empty = NodeRef::new_text("", Font::text(), Mode::Text);
        let world = NodeRef::new_text("world", Font::text(), Mode::Text);
        list::append(&par, empty.clone());
        list::append(&par, world.clone());

        let mut state = EditState::new(Caret::new(empty.clone(), 0));
        let mut history = History::new();
        advance(&mut state, &mut history).unwrap();

        assert!(history.undo().unwrap());
        assert_eq!(par.child_count(), 2);
    }

    #[test]
    fn advancing_within_a_node_elides_nothing() {
        let par = NodeRef::new_group(kinds::PAR);
        let hello = NodeRef::new_text("hello", Font::text(), Mode::Text);
        list::append(&par, hello.clone());

        let mut state = EditState::new(Caret::new(hello.clone(), 0));
        let mut history = History::new();
        let mutated = advance(&mut state, &mut history).unwrap();

        assert!(!mutated);
        assert!(hello.parent().is_some());
    }
}
