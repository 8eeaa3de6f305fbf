//! Reversible edit operations (§4.8). Every `perform` applies the op's effect and hands back its
//! inverse — `History` does nothing but stack these up.

use crate::error::EditError;
use draftex_caret::Caret;
use draftex_string::StringBuf;
use draftex_tree::{kinds, list, NodeRef};

/// One reversible edit. Variants mirror the table in §4.8 exactly; `MergePar` is the otherwise
/// unnamed "inverse merges the paragraphs" side of `SplitPar`.
#[derive(Clone)]
pub enum EditOp {
    InsertText { node: NodeRef, offset: usize, text: StringBuf },
    RemoveText { node: NodeRef, offset: usize, len: usize },
    InsertSpace { node: NodeRef, space: StringBuf },
    RemoveSpace { node: NodeRef },
    InsertNode { node: NodeRef, parent: NodeRef, pivot: Option<NodeRef> },
    RemoveNode { node: NodeRef },
    SplitText { node: NodeRef, offset: usize, sep: StringBuf },
    MergeText { left: NodeRef, right: NodeRef },
    SplitPar { node: NodeRef, offset: usize },
    MergePar { left: NodeRef, right: NodeRef },
    EraseRange { start: Caret, end: Caret },
    Sequence(Vec<EditOp>),
}

/// Splice `node` into `parent`'s child list right after `pivot`, or as the first child when
/// `pivot` is `None` (the position a node held before it was removed from an empty-prefix spot).
fn insert_at(parent: &NodeRef, pivot: &Option<NodeRef>, node: NodeRef) {
    match pivot {
        Some(p) => list::insert_after(p, node),
        None => match parent.first_child() {
            Some(first) => list::insert_before(&first, node),
            None => list::append(parent, node),
        },
    }
}

impl EditOp {
    /// Apply this edit and return its inverse.
    pub fn perform(&self) -> Result<EditOp, EditError> {
        match self {
            EditOp::InsertText { node, offset, text } => {
                node.with_text_mut(|t| t.insert_str(*offset, text.as_str()));
                Ok(EditOp::RemoveText { node: node.clone(), offset: *offset, len: text.len() })
            }

            EditOp::RemoveText { node, offset, len } => {
                let end = offset + len;
                let node_len = node.with_text(|t| t.len());
                if end > node_len {
                    return Err(EditError::OutOfBounds { offset: end, len: node_len });
                }
                let removed = node.with_text_mut(|t| t.remove_range(*offset..end));
                Ok(EditOp::InsertText { node: node.clone(), offset: *offset, text: removed })
            }

            EditOp::InsertSpace { node, space } => {
                let old = node.space_after();
                node.set_space_after(space.clone());
                Ok(EditOp::InsertSpace { node: node.clone(), space: old })
            }

            EditOp::RemoveSpace { node } => {
                let old = node.space_after();
                node.set_space_after(StringBuf::new());
                Ok(EditOp::InsertSpace { node: node.clone(), space: old })
            }

            EditOp::InsertNode { node, parent, pivot } => {
                insert_at(parent, pivot, node.clone());
                Ok(EditOp::RemoveNode { node: node.clone() })
            }

            EditOp::RemoveNode { node } => {
                let parent = node.parent().expect("RemoveNode: node must be attached");
                let pivot = node.prev();
                list::detach(node);
                Ok(EditOp::InsertNode { node: node.clone(), parent, pivot })
            }

            EditOp::SplitText { node, offset, sep } => {
                let old_space = node.space_after();
                let suffix = node.with_text_mut(|t| t.split_off(*offset));
                let new_node = NodeRef::new_text(suffix, node.font(), node.mode());
                new_node.set_space_after(old_space);
                node.set_space_after(sep.clone());
                list::insert_after(node, new_node.clone());
                Ok(EditOp::MergeText { left: node.clone(), right: new_node })
            }

            EditOp::MergeText { left, right } => {
                let right_text = right.with_text(|t| t.as_str().to_string());
                let right_space = right.space_after();
                let split_offset = left.with_text(|t| t.len());
                let split_sep = left.space_after();
                left.with_text_mut(|t| t.push_str(&right_text));
                left.set_space_after(right_space);
                list::remove(right);
                Ok(EditOp::SplitText { node: left.clone(), offset: split_offset, sep: split_sep })
            }

            EditOp::SplitPar { node, offset } => Ok(split_par(node, *offset)),

            EditOp::MergePar { left, right } => Ok(merge_par(left, right)),

            EditOp::EraseRange { start, end } => erase_range(start, end),

            EditOp::Sequence(ops) => {
                let mut inverses = Vec::with_capacity(ops.len());
                for op in ops {
                    inverses.push(op.perform()?);
                }
                inverses.reverse();
                Ok(EditOp::Sequence(inverses))
            }
        }
    }
}

/// Split the `par` containing `node` into two paragraphs at `(node, offset)`.
///
/// If `offset` falls mid-node, first splits the text node itself (with an empty separator — a
/// paragraph break carries no literal character) so the break always lands on a node boundary.
fn split_par(node: &NodeRef, offset: usize) -> EditOp {
    let par = node.parent().expect("split_par: node must be inside a par");
    debug_assert!(par.is_group_kind(kinds::PAR));

    let mut prefix_ops = Vec::new();
    let len = node.with_text(|t| t.len());
    // `boundary` is the first node that moves into the new paragraph; `None` means the split
    // point is at the very end of `par` and the new paragraph starts out empty.
    let boundary: Option<NodeRef> = if offset == 0 {
        Some(node.clone())
    } else if offset == len {
        node.next()
    } else {
        let split = EditOp::SplitText { node: node.clone(), offset, sep: StringBuf::new() };
        let inverse = split.perform().expect("split_par: SplitText cannot fail here");
        prefix_ops.push(inverse);
        node.next()
    };

    let new_par = NodeRef::new_group(kinds::PAR);
    list::insert_after(&par, new_par.clone());

    let all: Vec<NodeRef> = par.children().collect();
    let tail_start = match &boundary {
        Some(b) => all.iter().position(|n| NodeRef::ptr_eq(n, b)).unwrap_or(all.len()),
        None => all.len(),
    };
    let tail = &all[tail_start..];
    for n in tail {
        list::detach(n);
    }
    for n in tail {
        list::append(&new_par, n.clone());
    }

    if prefix_ops.is_empty() {
        EditOp::MergePar { left: par, right: new_par }
    } else {
        prefix_ops.push(EditOp::MergePar { left: par, right: new_par });
        EditOp::Sequence(prefix_ops)
    }
}

/// Move every child of `right` onto the end of `left`, then remove the now-empty `right` par.
fn merge_par(left: &NodeRef, right: &NodeRef) -> EditOp {
    let moved: Vec<NodeRef> = right.children().collect();
    for n in &moved {
        list::detach(n);
    }
    for n in &moved {
        list::append(left, n.clone());
    }
    list::remove(right);

    match moved.first() {
        Some(first) => EditOp::SplitPar { node: first.clone(), offset: 0 },
        None => {
            // `right` held no children (the split point was at the very end of `left`'s content);
            // reconstruct the same degenerate split by splitting right after `left`'s last node.
            let last = left.last_child().expect("merge_par: left cannot be empty after a merge");
            let offset = if last.is_text() { last.with_text(|t| t.len()) } else { 0 };
            EditOp::SplitPar { node: last, offset }
        }
    }
}

/// Delete every node strictly between `start.node` and `end.node` (which must share a parent),
/// plus the tail of `start` and the head of `end`. Returns the `Sequence` of re-inserts that
/// undoes it.
fn erase_range(start: &Caret, end: &Caret) -> Result<EditOp, EditError> {
    let mut inverse_ops = Vec::new();

    let start_len = start.node.with_text(|t| t.len());
    if start.offset < start_len {
        let removed = start.node.with_text_mut(|t| t.remove_range(start.offset..start_len));
        inverse_ops.push(EditOp::InsertText { node: start.node.clone(), offset: start.offset, text: removed });
    }

    let mut middle = Vec::new();
    let mut found_end = NodeRef::ptr_eq(&start.node, &end.node);
    if !found_end {
        let mut cur = start.node.next();
        while let Some(n) = cur {
            if NodeRef::ptr_eq(&n, &end.node) {
                found_end = true;
                break;
            }
            cur = n.next();
            middle.push(n);
        }
    }
    if !found_end {
        return Err(EditError::DisjointRange);
    }

    let mut middle_inverses = Vec::with_capacity(middle.len());
    for n in middle.iter().rev() {
        let parent = n.parent().ok_or(EditError::DisjointRange)?;
        let pivot = n.prev();
        list::detach(n);
        middle_inverses.push(EditOp::InsertNode { node: n.clone(), parent, pivot });
    }
    middle_inverses.reverse();
    inverse_ops.extend(middle_inverses);

    if end.offset > 0 {
        let removed = end.node.with_text_mut(|t| t.remove_range(0..end.offset));
        inverse_ops.push(EditOp::InsertText { node: end.node.clone(), offset: 0, text: removed });
    }

    Ok(EditOp::Sequence(inverse_ops))
}
