//! The caret itself and the navigation operations that don't need line layout (§4.7).

use crate::walk::{next_text, prev_text};
use draftex_tree::{kinds, NodeRef};
use tracing::trace;

/// A caret position: a Text node plus a byte offset into it.
#[derive(Clone)]
pub struct Caret {
    pub node: NodeRef,
    pub offset: usize,
}

impl Caret {
    pub fn new(node: NodeRef, offset: usize) -> Self {
        debug_assert!(node.is_text(), "Caret must sit on a Text node");
        Self { node, offset }
    }
}

/// One caret plus an optional selection anchor, and the sticky column used by `up`/`down`.
pub struct EditState {
    pub current: Caret,
    pub anchor: Option<Caret>,
    pub(crate) target_x: Option<f32>,
}

impl EditState {
    pub fn new(current: Caret) -> Self {
        Self { current, anchor: None, target_x: None }
    }

    /// Clear the sticky column; called by every horizontal move (§4.7: only `up`/`down` keep it).
    fn reset_target_x(&mut self) {
        self.target_x = None;
    }
}

/// Move one UTF-8 character forward: within the node if not at its end, else to the start of the
/// next Text node in document order.
pub fn advance(caret: &Caret) -> Option<Caret> {
    let len = caret.node.with_text(|t| t.len());
    if caret.offset < len {
        let next = caret.node.with_text(|t| t.next_char_boundary(caret.offset));
        Some(Caret::new(caret.node.clone(), next))
    } else {
        next_text(&caret.node).map(|n| Caret::new(n, 0))
    }
}

/// Mirror of [`advance`].
pub fn recede(caret: &Caret) -> Option<Caret> {
    if caret.offset > 0 {
        let prev = caret.node.with_text(|t| t.prev_char_boundary(caret.offset));
        Some(Caret::new(caret.node.clone(), prev))
    } else {
        prev_text(&caret.node).map(|n| {
            let len = n.with_text(|t| t.len());
            Caret::new(n, len)
        })
    }
}

/// The first Text node of the Line containing `node`.
fn line_first(node: &NodeRef) -> NodeRef {
    let mut cur = node.clone();
    while let Some(p) = cur.line_prev() {
        cur = p;
    }
    cur
}

/// The last Text node of the Line containing `node`.
fn line_last(node: &NodeRef) -> NodeRef {
    let mut cur = node.clone();
    while let Some(n) = cur.line_next() {
        cur = n;
    }
    cur
}

/// Jump to offset 0 of the first Text of the current Line.
pub fn home(caret: &Caret) -> Caret {
    Caret::new(line_first(&caret.node), 0)
}

/// Jump to the end of the last Text of the current Line.
pub fn end(caret: &Caret) -> Caret {
    let last = line_last(&caret.node);
    let len = last.with_text(|t| t.len());
    Caret::new(last, len)
}

/// A Text node is a "stop" unless its nearest enclosing Group is a bare `"curly"` wrapper
/// (DESIGN.md Open Question decision for §4.7).
fn is_stop(node: &NodeRef) -> bool {
    node.parent().map(|p| !p.is_group_kind(kinds::CURLY)).unwrap_or(true)
}

/// Jump to the start of the next stop.
pub fn next_stop(caret: &Caret) -> Option<Caret> {
    let mut cur = next_text(&caret.node)?;
    while !is_stop(&cur) {
        cur = next_text(&cur)?;
    }
    Some(Caret::new(cur, 0))
}

/// Jump to the end of the previous stop.
pub fn prev_stop(caret: &Caret) -> Option<Caret> {
    let mut cur = prev_text(&caret.node)?;
    while !is_stop(&cur) {
        cur = prev_text(&cur)?;
    }
    let len = cur.with_text(|t| t.len());
    Some(Caret::new(cur, len))
}

impl EditState {
    /// `advance`/`recede`/`home`/`end`/`prevStop`/`nextStop`: all reset the sticky column and are
    /// idempotent at the ends of the document (§7 "UI-level no-ops").
    pub fn advance(&mut self) {
        if let Some(c) = advance(&self.current) {
            self.current = c;
        }
        self.reset_target_x();
        trace!("caret advance");
    }

    pub fn recede(&mut self) {
        if let Some(c) = recede(&self.current) {
            self.current = c;
        }
        self.reset_target_x();
        trace!("caret recede");
    }

    pub fn home(&mut self) {
        self.current = home(&self.current);
        self.reset_target_x();
    }

    pub fn end(&mut self) {
        self.current = end(&self.current);
        self.reset_target_x();
    }

    pub fn next_stop(&mut self) {
        if let Some(c) = next_stop(&self.current) {
            self.current = c;
        }
        self.reset_target_x();
    }

    pub fn prev_stop(&mut self) {
        if let Some(c) = prev_stop(&self.current) {
            self.current = c;
        }
        self.reset_target_x();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_tree::{list, Font, Mode};

    fn make_hello_world() -> (NodeRef, NodeRef) {
        let root = NodeRef::new_group(kinds::ROOT);
        let par = NodeRef::new_group(kinds::PAR);
        let hello = NodeRef::new_text("hello", Font::text(), Mode::Text);
        let world = NodeRef::new_text("world", Font::text(), Mode::Text);
        list::append(&par, hello.clone());
        list::append(&par, world.clone());
        list::append(&root, par);
        (hello, world)
    }

    #[test]
    fn five_advances_reach_node_end_then_crosses_over() {
        let (hello, world) = make_hello_world();
        let mut caret = Caret::new(hello.clone(), 0);
        for _ in 0..5 {
            caret = advance(&caret).unwrap();
        }
        assert!(NodeRef::ptr_eq(&caret.node, &hello));
        assert_eq!(caret.offset, 5);

        caret = advance(&caret).unwrap();
        assert!(NodeRef::ptr_eq(&caret.node, &world));
        assert_eq!(caret.offset, 0);
    }

    #[test]
    fn advance_then_recede_is_identity() {
        let (hello, _world) = make_hello_world();
        let start = Caret::new(hello, 2);
        let next = advance(&start).unwrap();
        let back = recede(&next).unwrap();
        assert!(NodeRef::ptr_eq(&back.node, &start.node));
        assert_eq!(back.offset, start.offset);
    }

    #[test]
    fn stop_navigation_skips_curly_wrapped_text() {
        let root = NodeRef::new_group(kinds::ROOT);
        let par = NodeRef::new_group(kinds::PAR);
        let a = NodeRef::new_text("a", Font::text(), Mode::Text);
        let curly = NodeRef::new_group(kinds::CURLY);
        let wrapped = NodeRef::new_text("wrapped", Font::text(), Mode::Text);
        list::append(&curly, wrapped.clone());
        let b = NodeRef::new_text("b", Font::text(), Mode::Text);
        list::append(&par, a.clone());
        list::append(&par, curly);
        list::append(&par, b.clone());
        list::append(&root, par);

        let caret = Caret::new(a, 0);
        let stop = next_stop(&caret).unwrap();
        assert!(NodeRef::ptr_eq(&stop.node, &b));
    }
}
