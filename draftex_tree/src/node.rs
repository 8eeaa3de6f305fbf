//! `Node`, its variants, and the intrusive sibling/parent linkage (§3, §4.1).
//!
//! Each node is a single [`NodeData`] behind `Rc<RefCell<_>>`. A parent group owns its first
//! child; every node owns its next sibling. Previous-sibling and parent back-references are
//! `Weak`, so dropping the owning chain actually frees the subtree. History frames and carets
//! hold plain clones of `NodeRef`, which is what keeps a detached subtree alive across an undo.

use crate::font::{Font, LayoutBox, Mode};
use draftex_string::StringBuf;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Cheap discriminator for `Node::tag()`, without borrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTag {
    Text,
    Command,
    Group,
}

/// The three node variants of §3.1.
pub enum NodeKind {
    Text { text: StringBuf, font: Font, mode: Mode },
    Command { name: StringBuf },
    Group { kind: StringBuf, first: Option<NodeRef>, last: Option<WeakNodeRef> },
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Text { .. } => NodeTag::Text,
            NodeKind::Command { .. } => NodeTag::Command,
            NodeKind::Group { .. } => NodeTag::Group,
        }
    }
}

pub struct NodeData {
    kind: NodeKind,
    space_after: StringBuf,
    box_: LayoutBox,
    changed: bool,
    next: Option<NodeRef>,
    prev: Option<WeakNodeRef>,
    parent: Option<WeakNodeRef>,
    line_next: Option<WeakNodeRef>,
    line_prev: Option<WeakNodeRef>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            space_after: StringBuf::new(),
            box_: LayoutBox::default(),
            changed: true,
            next: None,
            prev: None,
            parent: None,
            line_next: None,
            line_prev: None,
        }
    }
}

/// A shared-owning handle to a node.
///
/// Cloning is a refcount bump, matching the C++ original's refcounted node pointer. Identity
/// (not structural) equality is what the tree cares about, so [`NodeRef::ptr_eq`] — not
/// `PartialEq` — is the comparison tree code should reach for. We still derive `PartialEq` for
/// convenience (e.g. `Option<NodeRef>` comparisons in tests), and it delegates to `ptr_eq`.
#[derive(Clone)]
pub struct NodeRef(Rc<RefCell<NodeData>>);

/// A non-owning reference to a node (previous sibling, parent, line linkage).
#[derive(Clone)]
pub struct WeakNodeRef(Weak<RefCell<NodeData>>);

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        NodeRef::ptr_eq(self, other)
    }
}
impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0.borrow();
        match &d.kind {
            NodeKind::Text { text, mode, .. } => {
                write!(f, "Text({:?}, {:?})", text.as_str(), mode)
            }
            NodeKind::Command { name } => write!(f, "Command({:?})", name.as_str()),
            NodeKind::Group { kind, .. } => write!(f, "Group({:?})", kind.as_str()),
        }
    }
}

impl NodeRef {
    pub fn new_text(text: impl Into<StringBuf>, font: Font, mode: Mode) -> Self {
        Self::from_data(NodeData::new(NodeKind::Text { text: text.into(), font, mode }))
    }

    pub fn new_command(name: impl Into<StringBuf>) -> Self {
        Self::from_data(NodeData::new(NodeKind::Command { name: name.into() }))
    }

    /// The generic Group factory. Specialized layout/serialize behavior is dispatched on the
    /// kind string by the `draftex_layout`/`draftex_serialize` crates (§4.4).
    pub fn new_group(kind: impl Into<StringBuf>) -> Self {
        Self::from_data(NodeData::new(NodeKind::Group { kind: kind.into(), first: None, last: None }))
    }

    fn from_data(data: NodeData) -> Self {
        NodeRef(Rc::new(RefCell::new(data)))
    }

    pub fn ptr_eq(a: &NodeRef, b: &NodeRef) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub fn downgrade(&self) -> WeakNodeRef {
        WeakNodeRef(Rc::downgrade(&self.0))
    }

    pub fn tag(&self) -> NodeTag {
        self.0.borrow().kind.tag()
    }

    pub fn is_text(&self) -> bool {
        self.tag() == NodeTag::Text
    }

    pub fn is_command(&self) -> bool {
        self.tag() == NodeTag::Command
    }

    pub fn is_group(&self) -> bool {
        self.tag() == NodeTag::Group
    }

    /// The group's kind discriminator (`"par"`, `"frac"`, `"root"`, ...), or `None` off-variant.
    pub fn group_kind(&self) -> Option<StringBuf> {
        match &self.0.borrow().kind {
            NodeKind::Group { kind, .. } => Some(kind.clone()),
            _ => None,
        }
    }

    pub fn is_group_kind(&self, kind: &str) -> bool {
        self.group_kind().map(|k| k.as_str() == kind).unwrap_or(false)
    }

    pub fn command_name(&self) -> Option<StringBuf> {
        match &self.0.borrow().kind {
            NodeKind::Command { name } => Some(name.clone()),
            _ => None,
        }
    }

    /// `true` for a Command whose name is `end <environment>`.
    pub fn is_end_marker(&self) -> bool {
        self.command_name().map(|n| n.as_str().starts_with("end ")).unwrap_or(false)
    }

    pub fn text(&self) -> StringBuf {
        match &self.0.borrow().kind {
            NodeKind::Text { text, .. } => text.clone(),
            _ => panic!("text(): node is not a Text node"),
        }
    }

    pub fn with_text<R>(&self, f: impl FnOnce(&StringBuf) -> R) -> R {
        match &self.0.borrow().kind {
            NodeKind::Text { text, .. } => f(text),
            _ => panic!("with_text(): node is not a Text node"),
        }
    }

    /// Mutate the text content, marking the node (and its ancestors) changed.
    pub fn with_text_mut<R>(&self, f: impl FnOnce(&mut StringBuf) -> R) -> R {
        let r = match &mut self.0.borrow_mut().kind {
            NodeKind::Text { text, .. } => f(text),
            _ => panic!("with_text_mut(): node is not a Text node"),
        };
        self.mark_changed();
        r
    }

    pub fn font(&self) -> Font {
        match &self.0.borrow().kind {
            NodeKind::Text { font, .. } => *font,
            _ => panic!("font(): node is not a Text node"),
        }
    }

    pub fn set_font(&self, font: Font) {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Text { font: f, .. } => *f = font,
            _ => panic!("set_font(): node is not a Text node"),
        }
        self.mark_changed();
    }

    pub fn mode(&self) -> Mode {
        match &self.0.borrow().kind {
            NodeKind::Text { mode, .. } => *mode,
            _ => panic!("mode(): node is not a Text node"),
        }
    }

    pub fn space_after(&self) -> StringBuf {
        self.0.borrow().space_after.clone()
    }

    pub fn set_space_after(&self, s: StringBuf) {
        self.0.borrow_mut().space_after = s;
        self.mark_changed();
    }

    pub fn box_(&self) -> LayoutBox {
        self.0.borrow().box_
    }

    pub fn set_box(&self, b: LayoutBox) {
        self.0.borrow_mut().box_ = b;
    }

    pub fn changed(&self) -> bool {
        self.0.borrow().changed
    }

    /// Mark this node changed, and propagate upward (I5) until an already-changed ancestor is
    /// reached (further propagation would be redundant).
    pub fn mark_changed(&self) {
        let mut cur = Some(self.clone());
        while let Some(n) = cur {
            let already = {
                let mut d = n.0.borrow_mut();
                std::mem::replace(&mut d.changed, true)
            };
            if already {
                break;
            }
            cur = n.parent();
        }
    }

    /// Clear `changed` for this node and, if it is a Group, its whole subtree (§5 `commit`).
    pub fn commit(&self) {
        self.0.borrow_mut().changed = false;
        if self.is_group() {
            for child in self.children() {
                child.commit();
            }
        }
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.0.borrow().parent.as_ref().and_then(WeakNodeRef::upgrade)
    }

    pub fn next(&self) -> Option<NodeRef> {
        self.0.borrow().next.clone()
    }

    pub fn prev(&self) -> Option<NodeRef> {
        self.0.borrow().prev.as_ref().and_then(WeakNodeRef::upgrade)
    }

    pub(crate) fn set_parent_weak(&self, p: Option<&NodeRef>) {
        self.0.borrow_mut().parent = p.map(NodeRef::downgrade);
    }

    pub(crate) fn set_prev_weak(&self, p: Option<&NodeRef>) {
        self.0.borrow_mut().prev = p.map(NodeRef::downgrade);
    }

    pub(crate) fn take_next(&self) -> Option<NodeRef> {
        self.0.borrow_mut().next.take()
    }

    pub(crate) fn set_next(&self, n: Option<NodeRef>) {
        self.0.borrow_mut().next = n;
    }

    pub fn first_child(&self) -> Option<NodeRef> {
        match &self.0.borrow().kind {
            NodeKind::Group { first, .. } => first.clone(),
            _ => None,
        }
    }

    pub fn last_child(&self) -> Option<NodeRef> {
        match &self.0.borrow().kind {
            NodeKind::Group { last, .. } => last.as_ref().and_then(WeakNodeRef::upgrade),
            _ => None,
        }
    }

    pub(crate) fn take_first_child(&self) -> Option<NodeRef> {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Group { first, .. } => first.take(),
            _ => panic!("take_first_child(): node is not a Group"),
        }
    }

    pub(crate) fn set_first_child(&self, n: Option<NodeRef>) {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Group { first, .. } => *first = n,
            _ => panic!("set_first_child(): node is not a Group"),
        }
    }

    pub(crate) fn set_last_child_weak(&self, n: Option<&NodeRef>) {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Group { last, .. } => *last = n.map(NodeRef::downgrade),
            _ => panic!("set_last_child_weak(): node is not a Group"),
        }
    }

    pub fn children(&self) -> ChildIter {
        ChildIter { next: self.first_child() }
    }

    pub fn children_rev(&self) -> RevChildIter {
        RevChildIter { next: self.last_child() }
    }

    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    pub fn is_empty_group(&self) -> bool {
        self.is_group() && self.first_child().is_none()
    }

    pub fn line_next(&self) -> Option<NodeRef> {
        self.0.borrow().line_next.as_ref().and_then(WeakNodeRef::upgrade)
    }

    pub fn line_prev(&self) -> Option<NodeRef> {
        self.0.borrow().line_prev.as_ref().and_then(WeakNodeRef::upgrade)
    }

    pub fn set_line_next(&self, n: Option<&NodeRef>) {
        self.0.borrow_mut().line_next = n.map(NodeRef::downgrade);
    }

    pub fn set_line_prev(&self, n: Option<&NodeRef>) {
        self.0.borrow_mut().line_prev = n.map(NodeRef::downgrade);
    }

    /// The root of the tree containing this node (walks parent links to the top).
    pub fn root(&self) -> NodeRef {
        let mut cur = self.clone();
        while let Some(p) = cur.parent() {
            cur = p;
        }
        cur
    }
}

impl WeakNodeRef {
    pub fn upgrade(&self) -> Option<NodeRef> {
        self.0.upgrade().map(NodeRef)
    }
}

/// Forward sibling iterator, with a `None` sentinel end (§4.1).
pub struct ChildIter {
    next: Option<NodeRef>,
}

impl Iterator for ChildIter {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let cur = self.next.take()?;
        self.next = cur.next();
        Some(cur)
    }
}

/// Reverse sibling iterator.
pub struct RevChildIter {
    next: Option<NodeRef>,
}

impl Iterator for RevChildIter {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let cur = self.next.take()?;
        self.next = cur.prev();
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list;

    #[test]
    fn new_text_node_is_changed_until_committed() {
        let n = NodeRef::new_text("hi", Font::text(), Mode::Text);
        assert!(n.changed());
        n.commit();
        assert!(!n.changed());
    }

    #[test]
    fn mark_changed_propagates_to_root() {
        let root = NodeRef::new_group("root");
        let par = NodeRef::new_group("par");
        list::append(&root, par.clone());
        root.commit();
        par.commit();
        assert!(!root.changed());

        let text = NodeRef::new_text("x", Font::text(), Mode::Text);
        list::append(&par, text.clone());
        assert!(par.changed());
        assert!(root.changed());
    }

    #[test]
    fn weak_back_links_let_subtree_drop() {
        let root = NodeRef::new_group("root");
        let child = NodeRef::new_text("bye", Font::text(), Mode::Text);
        list::append(&root, child.clone());
        drop(root);
        // child still alive via our handle; its parent link is now dangling (weak, upgrade fails)
        assert!(child.parent().is_none());
    }
}
