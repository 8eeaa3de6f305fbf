//! Two-pass layout (§4.6): intrinsic sizing bottom-up, then offset assignment top-down, with the
//! paragraph Line Builder (§4.6.1) folded into the size pass since line breaking and inline
//! positioning are naturally one walk.

pub mod context;
pub mod line;
pub mod offset;
pub mod size;

pub use context::{HeadlessMetrics, LayoutContext, Metrics};

use draftex_tree::{Font, Mode, NodeRef};

/// Run both layout passes over `root`, sized against `width`.
///
/// Resets heading numbering first: callers that relayout the same document repeatedly (e.g. the
/// edit REPL, which reuses one `ctx` across many mutating commands) must see section numbers that
/// reflect the current tree, not ones that keep climbing from the previous pass.
pub fn layout<M: Metrics>(root: &NodeRef, ctx: &mut LayoutContext<M>, width: f32) {
    ctx.reset_numbering();
    size::compute_size(root, ctx, Mode::Text, Font::text(), width);
    offset::assign_offsets(root, ctx);
}
