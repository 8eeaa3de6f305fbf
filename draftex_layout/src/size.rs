//! Pass 1: bottom-up intrinsic sizing (§4.6).

use crate::context::{LayoutContext, Metrics};
use crate::line;
use draftex_tree::{kinds, Font, FontFamily, FontSize, LayoutBox, Mode, NodeRef, NodeTag, Point};

/// Width clamp applied to a `document` Group, in ems.
const DOCUMENT_MAX_WIDTH_EM: f32 = 24.0;
/// `frac` shrinks its numerator/denominator by two font-size steps.
const FRAC_SHRINK_STEPS: u8 = 2;
/// Fraction of an em a trailing space occupies outside math mode.
const SPACE_WIDTH_EM: f32 = 0.25;
/// First-line indent of a plain paragraph, in ems (§4.6.1).
const PARAGRAPH_INDENT_EM: f32 = 1.5;

/// Compute `node`'s intrinsic size (and, for paragraphs, lay out its lines), writing the result
/// to `node`'s box. Recurses into every child first (bottom-up).
pub fn compute_size<M: Metrics>(
    node: &NodeRef,
    ctx: &mut LayoutContext<M>,
    mode: Mode,
    font: Font,
    width: f32,
) {
    match node.tag() {
        NodeTag::Text => size_text(node, ctx, font),
        NodeTag::Command => size_command(node, ctx),
        NodeTag::Group => size_group(node, ctx, mode, font, width),
    }
}

fn em_box(after: f32, em: f32) -> LayoutBox {
    LayoutBox { offset: Point::ZERO, before: 0.0, after, above: em * 0.5, below: em * 0.5 }
}

fn size_text<M: Metrics>(node: &NodeRef, ctx: &LayoutContext<M>, font: Font) {
    node.set_font(font);
    let pt = ctx.ptsize(font.size);
    let text = node.text();
    let after = ctx.metrics.offset(font.family, text.as_str(), pt);
    node.set_box(em_box(after, pt));
}

fn size_command<M: Metrics>(node: &NodeRef, ctx: &LayoutContext<M>) {
    let font = Font::command();
    let pt = ctx.ptsize(font.size);
    let name = node.command_name().expect("Command node");
    let after = ctx.metrics.offset(font.family, name.as_str(), pt);
    node.set_box(em_box(after, pt));
}

fn size_group<M: Metrics>(node: &NodeRef, ctx: &mut LayoutContext<M>, mode: Mode, font: Font, width: f32) {
    let kind = node.group_kind().expect("Group node");
    match kind.as_str() {
        "frac" => size_frac(node, ctx, mode, font),
        k if k == kinds::ROOT || k == kinds::DOCUMENT => size_vertical(node, ctx, mode, font, width, k == kinds::DOCUMENT),
        k if k == kinds::PAR => size_paragraph(node, ctx, mode, font, width),
        k if k == kinds::MATH => size_generic(node, ctx, Mode::Math, font, width),
        "title" | "author" | "section" | "subsection" => size_heading(node, ctx, mode, width, kind.as_str()),
        _ => size_generic(node, ctx, mode, font, width),
    }
}

fn size_generic<M: Metrics>(node: &NodeRef, ctx: &mut LayoutContext<M>, mode: Mode, font: Font, width: f32) {
    let mut after = 0.0f32;
    let mut above = 0.0f32;
    let mut below = 0.0f32;
    for child in node.children() {
        compute_size(&child, ctx, mode, font, width);
        let b = child.box_();
        after += b.width() + space_width(&child, ctx, mode);
        above = above.max(b.above);
        below = below.max(b.below);
    }
    node.set_box(LayoutBox { offset: Point::ZERO, before: 0.0, after, above, below });
}

fn size_frac<M: Metrics>(node: &NodeRef, ctx: &mut LayoutContext<M>, mode: Mode, font: Font) {
    let shrunk = font.shrunk(FRAC_SHRINK_STEPS);
    let mut children = node.children();
    let num = children.next();
    let den = children.next();
    let mut after = 0.0f32;
    let (mut above, mut below) = (0.0f32, 0.0f32);
    if let Some(num) = &num {
        compute_size(num, ctx, mode, shrunk, f32::INFINITY);
        let b = num.box_();
        after = after.max(b.width());
        above = b.height();
    }
    if let Some(den) = &den {
        compute_size(den, ctx, mode, shrunk, f32::INFINITY);
        let b = den.box_();
        after = after.max(b.width());
        below = b.height();
    }
    node.set_box(LayoutBox { offset: Point::ZERO, before: 0.0, after, above, below });
}

fn size_vertical<M: Metrics>(
    node: &NodeRef,
    ctx: &mut LayoutContext<M>,
    mode: Mode,
    font: Font,
    width: f32,
    is_document: bool,
) {
    let em = ctx.ptsize(font.size);
    let effective_width = if is_document { width.min(DOCUMENT_MAX_WIDTH_EM * em) } else { width };
    let mut total_height = 0.0f32;
    let mut max_width = 0.0f32;
    for child in node.children() {
        compute_size(&child, ctx, mode, font, effective_width);
        let b = child.box_();
        total_height += b.height();
        max_width = max_width.max(b.width());
    }
    node.set_box(LayoutBox {
        offset: Point::ZERO,
        before: 0.0,
        after: max_width,
        above: 0.0,
        below: total_height,
    });
}

fn size_paragraph<M: Metrics>(node: &NodeRef, ctx: &mut LayoutContext<M>, mode: Mode, font: Font, width: f32) {
    for child in node.children() {
        compute_size(&child, ctx, mode, font, width);
    }
    let indent = PARAGRAPH_INDENT_EM * ctx.ptsize(font.size);
    let height = line::build_lines(node, ctx, width, indent);
    node.set_box(LayoutBox { offset: Point::ZERO, before: 0.0, after: width, above: 0.0, below: height });
}

/// Per-kind font override for headings (§4.6.1), grounded on the original's static style table
/// (title → roman Huge; author/section/subsection → bold Large). This crate's `FontSize` only
/// distinguishes `Large`/`Huge` above `Normal`, collapsing the original's finer
/// `large`/`Large`/`LARGE` gradation between author/section/subsection.
fn heading_font(kind: &str) -> Font {
    match kind {
        "title" => Font { family: FontFamily::Roman, size: FontSize::Huge },
        _ => Font { family: FontFamily::Bold, size: FontSize::Large },
    }
}

/// A heading lays out like a paragraph (line-built, wrapping inline content) but in its own font
/// and with its first line indented to leave room for a numeric prefix (`"1.2 "`), mirroring the
/// original's `Par::updateSize` handling both uniformly.
fn size_heading<M: Metrics>(node: &NodeRef, ctx: &mut LayoutContext<M>, mode: Mode, width: f32, kind: &str) {
    let font = heading_font(kind);
    for child in node.children() {
        compute_size(&child, ctx, mode, font, width);
    }
    let indent = match ctx.heading_prefix(kind) {
        Some(prefix) => {
            let pt = ctx.ptsize(font.size);
            ctx.metrics.offset(font.family, &prefix, pt)
        }
        None => 0.0,
    };
    let height = line::build_lines(node, ctx, width, indent);
    node.set_box(LayoutBox { offset: Point::ZERO, before: 0.0, after: width, above: 0.0, below: height });
}

/// Width contributed by `node`'s trailing `space_after`, per §4.6 ("Space: width = 0 in math,
/// else 0.25 em"). Only Text nodes carry a mode of their own; Commands and Groups use the
/// ambient `mode` passed down the recursion.
pub(crate) fn space_width<M: Metrics>(node: &NodeRef, ctx: &LayoutContext<M>, mode: Mode) -> f32 {
    if node.space_after().is_empty() {
        return 0.0;
    }
    let effective_mode = if node.is_text() { node.mode() } else { mode };
    if effective_mode == Mode::Math {
        0.0
    } else {
        SPACE_WIDTH_EM * ctx.ptsize(draftex_tree::FontSize::Normal)
    }
}
