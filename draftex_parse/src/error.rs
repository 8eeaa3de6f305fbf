//! Ill-formed input (§7) raised by the tokenizer or expander.

use thiserror::Error;

/// A structural failure while turning markup into a tree.
///
/// Always fatal to the load operation: neither the tokenizer nor the expander attempts
/// recovery (§4.2). `offset` is a byte offset into the original input; the driver converts it
/// to a line/column for display rather than this crate carrying that concern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (at byte {offset})")]
pub struct IllFormed {
    pub message: String,
    pub offset: usize,
}

impl IllFormed {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self { message: message.into(), offset }
    }

    /// Convert `offset` to a 1-based `(line, column)` pair against `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for b in source.as_bytes().iter().take(self.offset) {
            if *b == b'\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}
