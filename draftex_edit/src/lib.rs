//! Reversible edit operations, composite editing behaviors, and undo/redo history (§4.8).
//!
//! Everything here builds on `draftex_tree::list`'s primitives; no function outside this crate
//! (and `draftex_tree::list` itself) should mutate tree shape directly, so every user-visible edit
//! stays undoable.

pub mod composite;
pub mod error;
pub mod history;
pub mod navigate;
pub mod op;

pub use composite::{break_paragraph, erase_next, erase_prev, erase_selection, insert_space, insert_text};
pub use error::EditError;
pub use history::History;
pub use navigate::{advance, recede};
pub use op::EditOp;
