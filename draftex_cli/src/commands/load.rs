use std::path::Path;

use anyhow::{anyhow, Context, Result};
use draftex_tree::NodeRef;

/// Read and parse `file`, converting an `IllFormed` error's byte offset into a 1-based
/// line/column pair for display (the parse crate deliberately leaves that conversion to the
/// driver).
pub fn load(file: &Path) -> Result<NodeRef> {
    let src = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    draftex_parse::parse(&src).map_err(|e| {
        let (line, col) = e.line_col(&src);
        anyhow!("{}:{}:{}: {}", file.display(), line, col, e.message)
    })
}
