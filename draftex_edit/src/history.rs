//! Undo/redo as a pair of LIFO stacks of inverses (§4.8), grounded on the teacher's
//! `actions/edit/undo.rs` transaction-stack shape.

use crate::error::EditError;
use crate::op::EditOp;
use tracing::debug;

/// `apply` pushes the inverse of whatever it ran onto `undo` and clears `redo` (a fresh edit
/// invalidates any previously-undone redo chain, same as the teacher's buffer).
#[derive(Default)]
pub struct History {
    undo: Vec<EditOp>,
    redo: Vec<EditOp>,
}

impl History {
    pub fn new() -> Self {
        Self { undo: Vec::new(), redo: Vec::new() }
    }

    /// Perform `op`, recording its inverse for `undo`.
    pub fn apply(&mut self, op: EditOp) -> Result<(), EditError> {
        let inverse = op.perform()?;
        debug!(undo_depth = self.undo.len() + 1, "edit applied");
        self.undo.push(inverse);
        self.redo.clear();
        Ok(())
    }

    /// Undo the most recent edit. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditError> {
        let Some(op) = self.undo.pop() else {
            return Ok(false);
        };
        let inverse = op.perform()?;
        debug!(redo_depth = self.redo.len() + 1, "edit undone");
        self.redo.push(inverse);
        Ok(true)
    }

    /// Redo the most recently undone edit. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditError> {
        let Some(op) = self.redo.pop() else {
            return Ok(false);
        };
        let inverse = op.perform()?;
        debug!(undo_depth = self.undo.len() + 1, "edit redone");
        self.undo.push(inverse);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
