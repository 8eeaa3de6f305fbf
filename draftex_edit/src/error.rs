use thiserror::Error;

/// Errors raised by an [`crate::op::EditOp`] or a composite editing behavior (§4.8, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no active selection")]
    NoSelection,

    #[error("current position is not inside a paragraph")]
    NotInParagraph,

    #[error("byte offset {offset} out of bounds (len {len})")]
    OutOfBounds { offset: usize, len: usize },

    #[error("cannot erase across unrelated subtrees")]
    DisjointRange,
}
