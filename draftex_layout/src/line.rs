//! The paragraph Line Builder (§4.6.1).
//!
//! Operates on a flat stream of already-sized inline items. `"curly"` wrapper Groups are
//! transparent (they carry no visual identity of their own, §4.4) and are flattened through;
//! every other node — Text, Command, or any other Group kind (`frac`, `math`, headings) — is one
//! atomic item in the line.

use crate::context::{LayoutContext, Metrics};
use crate::size::space_width;
use draftex_tree::{kinds, Mode, NodeRef, Point};
use smallvec::SmallVec;

/// The flattened inline stream for one paragraph. Most paragraphs are a handful of words, so
/// this stays on the stack.
type InlineItems = SmallVec<[NodeRef; 16]>;

/// Lay out `par`'s inline content into visual lines of width `width`, with `indent` added to the
/// first line only. Returns the paragraph's total height.
pub fn build_lines<M: Metrics>(par: &NodeRef, ctx: &LayoutContext<M>, width: f32, indent: f32) -> f32 {
    let items = flatten_inline(par);
    if items.is_empty() {
        return 0.0;
    }

    let mut pen_y = 0.0f32;
    let mut i = 0usize;
    let mut first_line = true;
    let mut line_last_text: Option<NodeRef> = None;

    while i < items.len() {
        let avail = width - if first_line { indent } else { 0.0 };
        let line_start = i;
        let mut used = 0.0f32;
        let mut max_above = 0.0f32;
        let mut max_below = 0.0f32;
        let mut j = i;

        // collectLine
        while j < items.len() {
            let b = items[j].box_();
            let width_with_space = b.width() + space_width(&items[j], ctx, Mode::Text);
            if used + b.width() > avail && j > line_start {
                break;
            }
            used += width_with_space;
            max_above = max_above.max(b.above);
            max_below = max_below.max(b.below);
            j += 1;
        }
        if j == line_start {
            // A single item wider than `avail`; place it alone rather than loop forever.
            j = line_start + 1;
            let b = items[line_start].box_();
            used = b.width();
            max_above = b.above;
            max_below = b.below;
        }

        // unwindEndSpace: the trailing space of the last item on the line is not rendered.
        let trailing_space = space_width(&items[j - 1], ctx, Mode::Text);
        used -= trailing_space;

        let space_count = items[line_start..j - 1]
            .iter()
            .filter(|n| space_width(n, ctx, Mode::Text) > 0.0)
            .count();
        let is_last_line = j >= items.len();
        let slack = (avail - used).max(0.0);
        let extra_per_space = if !is_last_line && space_count > 0 { slack / space_count as f32 } else { 0.0 };

        // position
        pen_y += max_above;
        let mut pen_x = if first_line { indent } else { 0.0 };
        for (k, item) in items[line_start..j].iter().enumerate() {
            let mut b = item.box_();
            b.offset = Point { x: pen_x, y: pen_y };
            item.set_box(b);
            pen_x += b.width();
            let sp = space_width(item, ctx, Mode::Text);
            if sp > 0.0 {
                pen_x += if k + line_start < j - 1 { sp + extra_per_space } else { 0.0 };
            }

            if item.is_text() {
                if let Some(prev) = &line_last_text {
                    prev.set_line_next(Some(item));
                    item.set_line_prev(Some(prev));
                }
                line_last_text = Some(item.clone());
            }
        }

        pen_y += max_below;
        i = j;
        first_line = false;
    }

    pen_y
}

fn flatten_inline(container: &NodeRef) -> InlineItems {
    let mut out = InlineItems::new();
    flatten_into(container, &mut out);
    out
}

fn flatten_into(container: &NodeRef, out: &mut InlineItems) {
    for child in container.children() {
        if child.is_group_kind(kinds::CURLY) {
            flatten_into(&child, out);
        } else {
            out.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HeadlessMetrics;
    use crate::size::compute_size;
    use draftex_string::StringBuf;
    use draftex_tree::{kinds as k, Font};

    fn ctx() -> LayoutContext<HeadlessMetrics> {
        LayoutContext::new(HeadlessMetrics::default(), 10.0)
    }

    fn word(s: &str, space: &str) -> NodeRef {
        let n = NodeRef::new_text(s, Font::text(), Mode::Text);
        if !space.is_empty() {
            n.set_space_after(StringBuf::from_str(space));
        }
        n
    }

    #[test]
    fn short_paragraph_fits_on_one_line() {
        let mut c = ctx();
        let par = NodeRef::new_group(k::PAR);
        draftex_tree::list::append(&par, word("one", " "));
        draftex_tree::list::append(&par, word("two", ""));
        for child in par.children() {
            compute_size(&child, &mut c, Mode::Text, Font::text(), 1000.0);
        }
        let height = build_lines(&par, &c, 1000.0, 0.0);
        assert!(height > 0.0);
        let words: Vec<_> = par.children().collect();
        assert_eq!(words[0].box_().offset.x, 0.0);
        assert!(words[1].box_().offset.x > words[0].box_().offset.x);
        // Both on the same visual line.
        assert_eq!(words[0].box_().offset.y, words[1].box_().offset.y);
    }

    #[test]
    fn narrow_width_forces_a_wrap() {
        let mut c = ctx();
        let par = NodeRef::new_group(k::PAR);
        draftex_tree::list::append(&par, word("aaaaaaaaaa", " "));
        draftex_tree::list::append(&par, word("bbbbbbbbbb", ""));
        for child in par.children() {
            compute_size(&child, &mut c, Mode::Text, Font::text(), 1000.0);
        }
        let first_width = par.first_child().unwrap().box_().width();
        let narrow = first_width + 1.0;
        let height = build_lines(&par, &c, narrow, 0.0);
        let words: Vec<_> = par.children().collect();
        assert!(words[1].box_().offset.y > words[0].box_().offset.y);
        assert!(height > 0.0);
    }
}
