//! Document-order (preorder) tree walking, shared by every navigation primitive in §4.7.

use draftex_tree::NodeRef;

/// The node visited immediately after `node` in a preorder (document-order) walk, or `None` at
/// the end of the tree.
pub fn preorder_next(node: &NodeRef) -> Option<NodeRef> {
    if node.is_group() {
        if let Some(first) = node.first_child() {
            return Some(first);
        }
    }
    let mut cur = node.clone();
    loop {
        if let Some(next) = cur.next() {
            return Some(next);
        }
        cur = cur.parent()?;
    }
}

/// The node visited immediately before `node` in a preorder walk, or `None` at the start.
pub fn preorder_prev(node: &NodeRef) -> Option<NodeRef> {
    match node.prev() {
        Some(prev) => {
            let mut cur = prev;
            while cur.is_group() {
                match cur.last_child() {
                    Some(last) => cur = last,
                    None => break,
                }
            }
            Some(cur)
        }
        None => node.parent(),
    }
}

/// The next Text node in document order after `node`.
pub fn next_text(node: &NodeRef) -> Option<NodeRef> {
    let mut cur = preorder_next(node)?;
    while !cur.is_text() {
        cur = preorder_next(&cur)?;
    }
    Some(cur)
}

/// The previous Text node in document order before `node`.
pub fn prev_text(node: &NodeRef) -> Option<NodeRef> {
    let mut cur = preorder_prev(node)?;
    while !cur.is_text() {
        cur = preorder_prev(&cur)?;
    }
    Some(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_tree::{list, Font, Mode, NodeRef as N};

    #[test]
    fn walks_across_sibling_and_group_boundaries() {
        let root = N::new_group("root");
        let par = N::new_group("par");
        let a = N::new_text("a", Font::text(), Mode::Text);
        let cmd = N::new_command("frac");
        let b = N::new_text("b", Font::text(), Mode::Text);
        list::append(&par, a.clone());
        list::append(&par, cmd);
        list::append(&par, b.clone());
        list::append(&root, par);

        assert!(N::ptr_eq(&next_text(&a).unwrap(), &b));
        assert!(N::ptr_eq(&prev_text(&b).unwrap(), &a));
        assert!(next_text(&b).is_none());
        assert!(prev_text(&a).is_none());
    }
}
