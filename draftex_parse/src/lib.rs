//! Markup → tree: the Tokenizer (§4.2) and the command-argument Expander (§4.3).
//!
//! [`parse`] runs both passes and hands back a fully structured tree, ready for
//! `enforce_rules`/layout. The two passes are also exposed separately since the CLI's `format`
//! and `layout` subcommands want the combined pipeline, while tests and the expander's own unit
//! tests want to drive the tokenizer alone.

pub mod error;
pub mod expander;
pub mod tokenizer;

pub use error::IllFormed;
pub use expander::expand;
pub use tokenizer::tokenize;

use draftex_tree::NodeRef;

/// Tokenize and then expand `input`, producing a structured document tree rooted at a `"root"`
/// Group. Runs `enforce_rules` once before handing the tree back, so every caller (including
/// `draftex_cli`) starts from a tree already normalized per §4.5, not just after its own edits.
pub fn parse(input: &str) -> Result<NodeRef, IllFormed> {
    let root = tokenize(input)?;
    expand(&root)?;
    draftex_tree::rules::enforce_rules(&root);
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_runs_tokenizer_then_expander() {
        let root = parse(r"a\frac{1}{2}b").unwrap();
        let par = root.first_child().unwrap();
        let nodes: Vec<_> = par.children().collect();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[1].is_group_kind("frac"));
    }
}
