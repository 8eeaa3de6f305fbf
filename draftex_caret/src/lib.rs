//! Caret position and navigation over the document tree (§4.7).
//!
//! This crate only reads the tree: it locates positions and Lines but never mutates a `Node`.
//! The one navigation-triggered mutation the spec describes — eliding a redundant empty Text node
//! crossed during a move — must be undo-reversible, so it belongs to `draftex_edit`'s `History`
//! rather than here; this crate only exposes the pure check ([`elision_candidate`]) that decides
//! when that applies.

pub mod caret;
pub mod vertical;
pub mod walk;

pub use caret::{advance, end, home, next_stop, prev_stop, recede, Caret, EditState};
pub use walk::{next_text, preorder_next, preorder_prev, prev_text};

use draftex_tree::NodeRef;

/// `true` if `node` is an empty Text node that navigation just stepped away from and that has no
/// other reason to exist (it isn't the only child of its parent Group, so removing it would never
/// leave a Group with zero children). The actual removal is performed by `draftex_edit` as a
/// `RemoveNode` edit so it can be undone.
pub fn elision_candidate(node: &NodeRef) -> bool {
    node.is_text()
        && node.with_text(|t| t.is_empty())
        && node.parent().map(|p| p.child_count() > 1).unwrap_or(false)
}
