//! Vertical caret motion (§4.7 `up`/`down`) with a sticky target column.
//!
//! Lines are derived from the `line_next`/`line_prev` chain `draftex_layout::line::build_lines`
//! threads through a paragraph's Text nodes (§4.6.1), not by walking the tree and comparing raw
//! box offsets. The Line Builder treats `frac`/`math`/headings as atomic items, so their own
//! internal Text nodes never join a paragraph's chain and live in their own coordinate frame;
//! comparing absolute offsets across a blind tree walk would group unrelated nodes onto the same
//! "line" whenever those two frames' y values happened to coincide. Walking the chain instead
//! only ever visits Text nodes that share one coordinate frame.

use crate::caret::{Caret, EditState};
use draftex_tree::NodeRef;

/// The Text nodes chained to `node` by the Line Builder, in document order.
fn chain_texts(node: &NodeRef) -> Vec<NodeRef> {
    let mut first = node.clone();
    while let Some(p) = first.line_prev() {
        first = p;
    }
    let mut out = vec![first.clone()];
    let mut cur = first;
    while let Some(n) = cur.line_next() {
        out.push(n.clone());
        cur = n;
    }
    out
}

/// Group a chain of Text nodes into Lines by their (shared) vertical offset.
fn lines_of(texts: &[NodeRef]) -> Vec<Vec<NodeRef>> {
    let mut lines: Vec<Vec<NodeRef>> = Vec::new();
    for t in texts {
        let y = t.box_().offset.y;
        match lines.last_mut() {
            Some(last) if last.first().map(|f| f.box_().offset.y) == Some(y) => last.push(t.clone()),
            _ => lines.push(vec![t.clone()]),
        }
    }
    lines
}

/// The absolute x position of a caret within its paragraph's coordinate frame.
fn absolute_x(caret: &Caret, ctx_char_width: f32) -> f32 {
    let b = caret.node.box_();
    b.offset.x + caret.offset as f32 * ctx_char_width
}

/// The caret in `line` whose start x is closest to `target_x`.
fn place_in_line(line: &[NodeRef], target_x: f32, ctx_char_width: f32) -> Caret {
    let mut best: Option<(f32, Caret)> = None;
    for node in line {
        let len = node.with_text(|t| t.len());
        let steps = if ctx_char_width > 0.0 {
            ((target_x - node.box_().offset.x) / ctx_char_width).round().max(0.0) as usize
        } else {
            0
        };
        let offset = steps.min(len);
        let candidate = Caret::new(node.clone(), offset);
        let x = absolute_x(&candidate, ctx_char_width);
        let dist = (x - target_x).abs();
        if best.as_ref().map(|(d, _)| dist < *d).unwrap_or(true) {
            best = Some((dist, candidate));
        }
    }
    best.map(|(_, c)| c).expect("line is never empty")
}

impl EditState {
    /// Move to the Line above the current one, keeping the sticky target column.
    pub fn up(&mut self, approx_char_width: f32) {
        self.vertical_move(-1, approx_char_width);
    }

    /// Move to the Line below the current one, keeping the sticky target column.
    pub fn down(&mut self, approx_char_width: f32) {
        self.vertical_move(1, approx_char_width);
    }

    fn vertical_move(&mut self, dir: i32, approx_char_width: f32) {
        let target_x = *self
            .target_x
            .get_or_insert_with(|| absolute_x(&self.current, approx_char_width));

        let texts = chain_texts(&self.current.node);
        let lines = lines_of(&texts);
        let cur_y = self.current.node.box_().offset.y;
        let cur_idx = lines
            .iter()
            .position(|l| l.first().map(|f| f.box_().offset.y) == Some(cur_y))
            .unwrap_or(0);

        let new_idx = cur_idx as i32 + dir;
        if new_idx < 0 || new_idx as usize >= lines.len() {
            return;
        }
        self.current = place_in_line(&lines[new_idx as usize], target_x, approx_char_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_tree::{Font, LayoutBox, Mode, Point};

    fn text_at(s: &str, x: f32, y: f32) -> NodeRef {
        let n = NodeRef::new_text(s, Font::text(), Mode::Text);
        let mut b = LayoutBox::default();
        b.offset = Point { x, y };
        b.after = s.len() as f32;
        n.set_box(b);
        n
    }

    /// Chain `nodes` the way `build_lines` would, in document order.
    fn chain(nodes: &[NodeRef]) {
        for pair in nodes.windows(2) {
            pair[0].set_line_next(Some(&pair[1]));
            pair[1].set_line_prev(Some(&pair[0]));
        }
    }

    #[test]
    fn down_moves_to_the_next_line_at_a_similar_column() {
        let line1a = text_at("hello", 0.0, 0.0);
        let line1b = text_at("world", 5.0, 0.0);
        let line2a = text_at("goodbye", 0.0, 10.0);
        chain(&[line1a.clone(), line1b.clone(), line2a.clone()]);

        let mut state = EditState::new(Caret::new(line1b, 2));
        state.down(1.0);
        assert!(NodeRef::ptr_eq(&state.current.node, &line2a));
    }

    #[test]
    fn up_at_the_first_line_is_a_no_op() {
        let line1 = text_at("hi", 0.0, 0.0);
        chain(&[line1.clone()]);

        let mut state = EditState::new(Caret::new(line1.clone(), 0));
        state.up(1.0);
        assert!(NodeRef::ptr_eq(&state.current.node, &line1));
    }

    #[test]
    fn a_frac_s_internal_text_never_joins_the_enclosing_paragraph_s_chain() {
        // A frac numerator happens to live at local y 0.0, same as the paragraph's own first
        // line in absolute terms — but it was never chained by build_lines, so it must not be
        // treated as part of the paragraph's Line 1.
        let para_line = text_at("para", 0.0, 0.0);
        chain(&[para_line.clone()]);
        let frac_numerator = text_at("1", 0.0, 0.0);

        let texts = chain_texts(&para_line);
        assert_eq!(texts.len(), 1);
        assert!(!texts.iter().any(|t| NodeRef::ptr_eq(t, &frac_numerator)));
    }
}
