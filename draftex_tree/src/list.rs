//! O(1) tree mutation primitmives: `append`, `insert_before`, `insert_after`, `detach`, `remove`
//! (§4.1).
//!
//! These are the *only* sanctioned way to mutate tree shape (§3.3); every `EditOp` in
//! `draftex_edit` is built on top of this module. Violating a precondition here (e.g. appending
//! an already-attached node) is a programming error, not a user-facing one, so these functions
//! panic rather than return a `Result` (§7 "Precondition violation").

use crate::node::NodeRef;

/// Append `child` as the new last child of `parent`.
///
/// `child` must be detached (no parent/prev/next).
pub fn append(parent: &NodeRef, child: NodeRef) {
    assert!(parent.is_group(), "append: parent must be a Group");
    assert!(
        child.parent().is_none() && child.prev().is_none() && child.next().is_none(),
        "append: child must be detached"
    );

    match parent.last_child() {
        Some(old_last) => {
            old_last.set_next(Some(child.clone()));
            child.set_prev_weak(Some(&old_last));
        }
        None => {
            parent.set_first_child(Some(child.clone()));
        }
    }
    parent.set_last_child_weak(Some(&child));
    child.set_parent_weak(Some(parent));
    parent.mark_changed();
}

/// Splice `node` into the list immediately before `pivot`.
///
/// `pivot` must be attached; `node` must be detached.
pub fn insert_before(pivot: &NodeRef, node: NodeRef) {
    let parent = pivot.parent().expect("insert_before: pivot must be attached");
    assert!(
        node.parent().is_none() && node.prev().is_none() && node.next().is_none(),
        "insert_before: node must be detached"
    );

    let prev = pivot.prev();
    node.set_parent_weak(Some(&parent));
    node.set_prev_weak(prev.as_ref());

    match &prev {
        Some(p) => {
            let owned = p.take_next();
            debug_assert!(owned.as_ref().map(|o| NodeRef::ptr_eq(o, pivot)).unwrap_or(false));
            node.set_next(owned);
            p.set_next(Some(node.clone()));
        }
        None => {
            let owned = parent.take_first_child();
            debug_assert!(owned.as_ref().map(|o| NodeRef::ptr_eq(o, pivot)).unwrap_or(false));
            node.set_next(owned);
            parent.set_first_child(Some(node.clone()));
        }
    }
    pivot.set_prev_weak(Some(&node));
    parent.mark_changed();
}

/// Splice `node` into the list immediately after `pivot`.
///
/// Equivalent to `insert_before(pivot.next(), node)` when `pivot` has a next sibling, else
/// `append`.
pub fn insert_after(pivot: &NodeRef, node: NodeRef) {
    match pivot.next() {
        Some(next) => insert_before(&next, node),
        None => {
            let parent = pivot.parent().expect("insert_after: pivot must be attached");
            append(&parent, node);
        }
    }
}

/// Detach `node` from its current position, returning the owning handle.
///
/// No-op on an already-detached node (returns it unchanged).
pub fn detach(node: &NodeRef) -> NodeRef {
    let parent = node.parent();
    let prev = node.prev();
    let next = node.take_next();

    match &prev {
        Some(p) => p.set_next(next.clone()),
        None => {
            if let Some(par) = &parent {
                par.set_first_child(next.clone());
            }
        }
    }
    match &next {
        Some(n) => n.set_prev_weak(prev.as_ref()),
        None => {
            if let Some(par) = &parent {
                par.set_last_child_weak(prev.as_ref());
            }
        }
    }

    node.set_prev_weak(None);
    node.set_parent_weak(None);
    if let Some(par) = &parent {
        par.mark_changed();
    }
    node.clone()
}

/// Detach `node` and drop it. Equivalent to `detach` when the caller discards the result, but
/// names the "delete for good" intent (§3.3).
pub fn remove(node: &NodeRef) {
    detach(node);
}
