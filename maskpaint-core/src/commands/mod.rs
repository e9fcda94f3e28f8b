//! # Actions
//!
//! Actions are the reversible structural edits recorded on the document history: canvas
//! resizes and layer add/remove/reorder/property changes. Painting is *not* an
//! action; strokes have their own per-layer undo on [`crate::state::Layer`].
//!
//! Actions are applied and reverted through a [`crate::queue::HistoryManager`].

mod layer;
mod resize;

pub use layer::{
    AddLayerAction, MoveDirection, MoveLayerAction, RemoveLayerAction, SetBlendModeAction,
    SetOpacityAction,
};
pub use resize::ResizeCanvasAction;

use crate::state::Document;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("layer referenced by the action is not found")]
    UnknownLayer,
    #[error("action applied to a document state that does not match the one it was recorded against")]
    MismatchedState,
    #[error("action makes no changes")]
    NoOp,
}

/// A reversible edit of a [`Document`].
///
/// If `execute` or `undo` returns an error, the document must not be observably changed.
/// `execute` may be called again after `undo` (redo), and must reproduce the same result.
pub trait Action {
    fn execute(&mut self, document: &mut Document) -> Result<(), ActionError>;
    fn undo(&mut self, document: &mut Document) -> Result<(), ActionError>;
    /// Short human readable label, e.g. for an "Undo ..." menu entry.
    fn description(&self) -> String;
}
impl std::fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Action").field(&self.description()).finish()
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum DoUndo {
    Do,
    Undo,
}
impl DoUndo {
    /// Run the matching half of `action`.
    pub fn apply(self, action: &mut dyn Action, document: &mut Document) -> Result<(), ActionError> {
        match self {
            Self::Do => action.execute(document),
            Self::Undo => action.undo(document),
        }
    }
}
