//! Pass 2: top-down offset assignment (§4.6).
//!
//! Sizes (and, for paragraphs, line positions) are already computed by [`crate::size`]. This
//! pass positions the children of every *other* container kind within their parent's frame, then
//! recurses so nested containers (e.g. a `frac` sitting inside a paragraph) get their own
//! children positioned too.

use draftex_tree::{kinds, Mode, NodeRef, NodeTag, Point};

use crate::context::{LayoutContext, Metrics};
use crate::size::space_width;

/// Assign offsets to every descendant of `node` (`node`'s own offset is the caller's concern).
pub fn assign_offsets<M: Metrics>(node: &NodeRef, ctx: &LayoutContext<M>) {
    if node.tag() != NodeTag::Group {
        return;
    }
    let kind = node.group_kind().expect("Group node");
    match kind.as_str() {
        k if k == kinds::PAR || matches!(k, "title" | "author" | "section" | "subsection") => {
            // Direct children already positioned by the Line Builder; just recurse deeper.
            for child in node.children() {
                assign_offsets(&child, ctx);
            }
        }
        "frac" => {
            let after = node.box_().after;
            let mut children = node.children();
            if let Some(num) = children.next() {
                let mut b = num.box_();
                b.offset = Point { x: (after - b.width()) * 0.5, y: 0.0 };
                let num_height = b.height();
                num.set_box(b);
                assign_offsets(&num, ctx);
                if let Some(den) = children.next() {
                    let mut db = den.box_();
                    db.offset = Point { x: (after - db.width()) * 0.5, y: num_height };
                    den.set_box(db);
                    assign_offsets(&den, ctx);
                }
            }
        }
        k if k == kinds::ROOT || k == kinds::DOCUMENT => {
            let mut y = 0.0f32;
            for child in node.children() {
                let mut b = child.box_();
                b.offset = Point { x: 0.0, y };
                y += b.height();
                child.set_box(b);
                assign_offsets(&child, ctx);
            }
        }
        _ => {
            let mut x = 0.0f32;
            for child in node.children() {
                let mut b = child.box_();
                b.offset = Point { x, y: 0.0 };
                x += b.width() + space_width(&child, ctx, Mode::Text);
                child.set_box(b);
                assign_offsets(&child, ctx);
            }
        }
    }
}
