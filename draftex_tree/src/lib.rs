//! The document tree: node variants, intrusive linkage, and mutation primitives (§3, §4.1, §4.4,
//! §4.5).
//!
//! This crate has no notion of markup syntax or layout — it is the `Node` sum type plus the
//! handful of O(1) operations (`append`, `insert_before`, `insert_after`, `detach`, `remove`)
//! that every higher layer (tokenizer, expander, layout, caret, edit) builds on.

pub mod font;
pub mod list;
pub mod node;
pub mod rules;

pub use font::{Font, FontFamily, FontSize, LayoutBox, Mode, Point};
pub use node::{ChildIter, NodeKind, NodeRef, NodeTag, RevChildIter, WeakNodeRef};

/// Group kind constants used throughout the crate (§3.1, §4.4).
pub mod kinds {
    pub const ROOT: &str = "root";
    pub const DOCUMENT: &str = "document";
    pub const PAR: &str = "par";
    pub const MATH: &str = "math";
    pub const CURLY: &str = "curly";
    pub const FRAC: &str = "frac";
    pub const TITLE: &str = "title";
    pub const AUTHOR: &str = "author";
    pub const SECTION: &str = "section";
    pub const SUBSECTION: &str = "subsection";
}
