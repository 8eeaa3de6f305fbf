//! Render pass: walk a laid-out tree and issue draw calls against a [`Canvas`] (§6).
//!
//! Mirrors the original's `Group::render`/`Command::render`/`Text::render` trio: a Group
//! recurses into its children with `offset + box.offset` accumulated via `Canvas::shift`; a
//! Command draws its name in a distinct sans color; a Text node draws in its own font and mode
//! color.

use draftex_layout::{LayoutContext, Metrics};
use draftex_tree::{kinds, Font, FontFamily, FontSize, Mode, NodeRef, NodeTag, Point};

use crate::canvas::{Canvas, Color};

const COMMAND_COLOR: Color = Color { r: 0.3, g: 0.9, b: 0.1, a: 1.0 };
const TEXT_COLOR: Color = Color::BLACK;
/// `mix(white, black, 0.6)`, the original's heading-prefix color.
const PRETITLE_COLOR: Color = Color { r: 0.4, g: 0.4, b: 0.4, a: 1.0 };

/// Numbering counters for heading prefixes, kept separate from (and nested, unlike)
/// `LayoutContext::counters`: subsections number within their enclosing section
/// (`"1.1 "`, `"1.2 "`, ...), which the layout pass's flat per-kind counter doesn't model since
/// nothing there currently reads it back for display. This pass is the one place the prefix
/// text is actually needed, so it keeps its own state.
#[derive(Default)]
struct Numbering {
    section: u32,
    subsection: u32,
}

impl Numbering {
    fn prefix(&mut self, kind: &str) -> Option<String> {
        match kind {
            "section" => {
                self.section += 1;
                self.subsection = 0;
                Some(format!("{} ", self.section))
            }
            "subsection" => {
                self.subsection += 1;
                Some(format!("{}.{} ", self.section, self.subsection))
            }
            _ => None,
        }
    }
}

/// Render every descendant of `root` against `canvas`, using `ctx` for font-size resolution.
pub fn render<M: Metrics, C: Canvas>(root: &NodeRef, ctx: &LayoutContext<M>, canvas: &mut C) {
    let mut numbering = Numbering::default();
    render_node(root, ctx, canvas, &mut numbering, Mode::Text);
}

fn render_node<M: Metrics, C: Canvas>(
    node: &NodeRef,
    ctx: &LayoutContext<M>,
    canvas: &mut C,
    numbering: &mut Numbering,
    mode: Mode,
) {
    match node.tag() {
        NodeTag::Text => render_text(node, ctx, canvas),
        NodeTag::Command => render_command(node, ctx, canvas),
        NodeTag::Group => render_group(node, ctx, canvas, numbering, mode),
    }
}

fn render_text<M: Metrics, C: Canvas>(node: &NodeRef, ctx: &LayoutContext<M>, canvas: &mut C) {
    let font = node.font();
    let pt = ctx.ptsize(font.size);
    let handle = canvas.font(font, pt);
    canvas.set(TEXT_COLOR);
    node.with_text(|t| canvas.draw_line(origin(node), t.as_str(), handle));
}

fn render_command<M: Metrics, C: Canvas>(node: &NodeRef, ctx: &LayoutContext<M>, canvas: &mut C) {
    let font = Font::command();
    let pt = ctx.ptsize(font.size);
    let handle = canvas.font(font, pt);
    canvas.set(COMMAND_COLOR);
    let name = node.command_name().expect("Command node");
    canvas.draw_line(origin(node), name.as_str(), handle);
}

fn render_group<M: Metrics, C: Canvas>(
    node: &NodeRef,
    ctx: &LayoutContext<M>,
    canvas: &mut C,
    numbering: &mut Numbering,
    mode: Mode,
) {
    let kind = node.group_kind().expect("Group node");
    let child_mode = if kind.as_str() == kinds::MATH { Mode::Math } else { mode };

    canvas.shift(node.box_().offset);

    if let Some(prefix) = numbering.prefix(kind.as_str()) {
        let font = heading_font(kind.as_str());
        let pt = ctx.ptsize(font.size);
        let handle = canvas.font(font, pt);
        canvas.set(PRETITLE_COLOR);
        canvas.draw_line(Point::ZERO, &prefix, handle);
    }

    for child in node.children() {
        render_node(&child, ctx, canvas, numbering, child_mode);
    }

    canvas.shift(Point { x: -node.box_().offset.x, y: -node.box_().offset.y });
}

fn origin(node: &NodeRef) -> Point {
    node.box_().offset
}

/// The same per-kind font table `draftex_layout::size` uses to size a heading and reserve its
/// indent, duplicated here so the drawn prefix matches the font its width was measured in.
fn heading_font(kind: &str) -> Font {
    match kind {
        "title" => Font { family: FontFamily::Roman, size: FontSize::Huge },
        _ => Font { family: FontFamily::Bold, size: FontSize::Large },
    }
}
