use super::{Action, ActionError};
use crate::canvas::{CanvasSize, ResizeMode};
use crate::state::layer_manager::ResizeSnapshot;
use crate::state::Document;

/// Change the canvas size, remapping every layer's strokes according to `mode`.
///
/// Undo restores the previous size and puts every layer's geometry back exactly as it was,
/// so execute, undo, execute always lands on the same floats. Layers painted on in between are
/// run through the transform backwards instead, see
/// [`crate::state::transform::ResizeTransform::reverse`].
#[derive(Clone, Debug)]
pub struct ResizeCanvasAction {
    new_size: CanvasSize,
    mode: ResizeMode,
    /// Size before the most recent `execute`.
    previous_size: Option<CanvasSize>,
    /// Layer geometry before the most recent `execute`, until undone.
    snapshot: Option<ResizeSnapshot>,
}
impl ResizeCanvasAction {
    #[must_use]
    pub fn new(new_size: CanvasSize, mode: ResizeMode) -> Self {
        Self {
            new_size,
            mode,
            previous_size: None,
            snapshot: None,
        }
    }
    #[must_use]
    pub fn new_size(&self) -> CanvasSize {
        self.new_size
    }
    #[must_use]
    pub fn mode(&self) -> ResizeMode {
        self.mode
    }
    #[must_use]
    pub fn previous_size(&self) -> Option<CanvasSize> {
        self.previous_size
    }
}
impl Action for ResizeCanvasAction {
    fn execute(&mut self, document: &mut Document) -> Result<(), ActionError> {
        let previous = document.canvas_size;
        // Recorded even when unchanged, so undo always has something to restore.
        self.previous_size = Some(previous);
        document.canvas_size = self.new_size;
        self.snapshot = Some(document.layers.transform_all_layers_recorded(
            previous,
            self.new_size,
            self.mode,
        ));
        Ok(())
    }
    fn undo(&mut self, document: &mut Document) -> Result<(), ActionError> {
        let previous = self.previous_size.ok_or(ActionError::MismatchedState)?;
        if document.canvas_size != self.new_size {
            return Err(ActionError::MismatchedState);
        }
        let snapshot = self.snapshot.take().ok_or(ActionError::MismatchedState)?;
        document.canvas_size = previous;
        document
            .layers
            .revert_resize(snapshot, previous, self.new_size, self.mode);
        Ok(())
    }
    fn description(&self) -> String {
        format!("{} canvas to {}", self.mode.as_ref(), self.new_size)
    }
}
