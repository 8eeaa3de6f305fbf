use std::path::Path;

use anyhow::Result;
use draftex_layout::{HeadlessMetrics, LayoutContext};
use draftex_tree::{NodeRef, NodeTag};

use super::load::load;

/// `draftex layout <file> --width <em>`: lay out against a headless metrics context, print the
/// computed box tree.
pub fn run(file: &Path, width_em: f32) -> Result<()> {
    let root = load(file)?;

    let key_size = 10.0;
    let mut ctx = LayoutContext::new(HeadlessMetrics::default(), key_size);
    let width = width_em * key_size;
    draftex_layout::layout(&root, &mut ctx, width);

    print_box(&root, 0);
    Ok(())
}

fn print_box(node: &NodeRef, depth: usize) {
    let indent = "  ".repeat(depth);
    let b = node.box_();
    let label = match node.tag() {
        NodeTag::Text => format!("Text {:?}", node.with_text(|t| t.as_str().to_string())),
        NodeTag::Command => format!("Command \\{}", node.command_name().expect("Command node")),
        NodeTag::Group => format!("Group {}", node.group_kind().expect("Group node")),
    };
    println!(
        "{indent}{label} offset=({:.1},{:.1}) before={:.1} after={:.1} above={:.1} below={:.1}",
        b.offset.x, b.offset.y, b.before, b.after, b.above, b.below
    );
    for child in node.children() {
        print_box(&child, depth + 1);
    }
}
