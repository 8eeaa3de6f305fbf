//! `enforceRules` (§4.5) and an invariant checker used by tests and by callers that want to
//! assert (P1)/(I1) held after a sequence of edits.

use crate::font::{Font, Mode};
use crate::list;
use crate::node::NodeRef;

/// Recursively remove empty Text nodes sandwiched between two other Text nodes (I3), and insert
/// an empty Text node between two adjacent non-Text siblings (a Command or Group has no caret
/// stop of its own, so two of them sitting next to each other with nothing between leave no
/// landing position).
///
/// This is the single normalization the editing kernel runs after an edit, before the next
/// layout pass (§5). It does not merge adjacent non-empty Text nodes — that only happens as an
/// explicit `MergeText` edit (§4.8).
pub fn enforce_rules(node: &NodeRef) {
    if !node.is_group() {
        return;
    }
    let mut cur = node.first_child();
    while let Some(n) = cur {
        let next = n.next();
        if n.is_group() {
            enforce_rules(&n);
        } else if n.is_text() && n.with_text(|t| t.is_empty()) {
            let flanked_by_text =
                n.prev().map(|p| p.is_text()).unwrap_or(false) && next.as_ref().map(|x| x.is_text()).unwrap_or(false);
            if flanked_by_text {
                list::remove(&n);
            }
        }

        if !n.is_text() {
            if let Some(nx) = &next {
                if !nx.is_text() {
                    list::insert_after(&n, NodeRef::new_text("", Font::text(), Mode::Text));
                }
            }
        }

        cur = next;
    }
}

/// Check (I1)/(P1) — sibling/parent back-links are consistent — over the whole subtree rooted
/// at `node`. Returns the first violation found, if any.
pub fn check_invariants(node: &NodeRef) -> Result<(), String> {
    if !node.is_group() {
        return Ok(());
    }
    let mut prev: Option<NodeRef> = None;
    for child in node.children() {
        match (child.prev(), &prev) {
            (Some(a), Some(b)) if NodeRef::ptr_eq(&a, b) => {}
            (None, None) => {}
            _ => return Err(format!("{child:?}: prev link does not match actual previous sibling")),
        }
        match child.parent() {
            Some(p) if NodeRef::ptr_eq(&p, node) => {}
            _ => return Err(format!("{child:?}: parent link does not point back to {node:?}")),
        }
        check_invariants(&child)?;
        prev = Some(child);
    }
    match (node.last_child(), &prev) {
        (Some(a), Some(b)) if NodeRef::ptr_eq(&a, b) => {}
        (None, None) => {}
        _ => return Err(format!("{node:?}: group's last-child link does not match actual last child")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Font, Mode};

    fn text(s: &str) -> NodeRef {
        NodeRef::new_text(s, Font::text(), Mode::Text)
    }

    #[test]
    fn removes_empty_text_between_two_text_nodes() {
        let root = NodeRef::new_group("root");
        list::append(&root, text("foo"));
        list::append(&root, text(""));
        list::append(&root, text("bar"));

        enforce_rules(&root);

        let names: Vec<_> = root.children().map(|n| n.text().as_str().to_string()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn keeps_empty_text_next_to_a_command() {
        let root = NodeRef::new_group("root");
        list::append(&root, NodeRef::new_command("frac"));
        list::append(&root, text(""));
        list::append(&root, text("x"));

        enforce_rules(&root);

        assert_eq!(root.child_count(), 3);
    }

    #[test]
    fn inserts_empty_text_between_two_adjacent_commands() {
        let root = NodeRef::new_group("root");
        list::append(&root, NodeRef::new_command("alpha"));
        list::append(&root, NodeRef::new_command("beta"));

        enforce_rules(&root);

        let children: Vec<_> = root.children().collect();
        assert_eq!(children.len(), 3);
        assert!(children[1].is_text());
        assert!(children[1].with_text(|t| t.is_empty()));
    }

    #[test]
    fn inserts_empty_text_between_two_adjacent_non_curly_groups() {
        let root = NodeRef::new_group("root");
        list::append(&root, NodeRef::new_group("frac"));
        list::append(&root, NodeRef::new_group("frac"));

        enforce_rules(&root);

        let children: Vec<_> = root.children().collect();
        assert_eq!(children.len(), 3);
        assert!(children[1].is_text());
    }

    #[test]
    fn does_not_flank_a_group_already_neighboring_text() {
        let root = NodeRef::new_group("root");
        list::append(&root, text("x"));
        list::append(&root, NodeRef::new_group("frac"));

        enforce_rules(&root);

        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn check_invariants_passes_on_well_formed_tree() {
        let root = NodeRef::new_group("root");
        let par = NodeRef::new_group("par");
        list::append(&root, par.clone());
        list::append(&par, text("hello"));
        list::append(&par, text("world"));

        assert!(check_invariants(&root).is_ok());
    }
}
