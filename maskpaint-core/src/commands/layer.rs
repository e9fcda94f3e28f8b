//! Layer stack edits recorded on the document history.

use super::{Action, ActionError};
use crate::blend::BlendMode;
use crate::io::Bitmap;
use crate::notify::Change;
use crate::state::{Document, Layer, LayerID};

/// Push a new layer on top of the stack and make it active.
///
/// The layer is built up front, so its ID is known before it is added. Undo detaches it and
/// keeps it, so a redo brings back the very same layer, strokes included.
#[derive(Debug)]
pub struct AddLayerAction {
    id: LayerID,
    name: String,
    /// The layer while it is not in the document.
    pending: Option<Layer>,
}
impl AddLayerAction {
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::with_layer(Layer::new(name))
    }
    #[must_use]
    pub fn from_bitmap(bitmap: Bitmap, name: impl Into<String>) -> Self {
        Self::with_layer(Layer::with_image(name, bitmap))
    }
    fn with_layer(layer: Layer) -> Self {
        Self {
            id: layer.id(),
            name: layer.name().to_owned(),
            pending: Some(layer),
        }
    }
    /// The layer this action adds.
    #[must_use]
    pub fn layer_id(&self) -> LayerID {
        self.id
    }
}
impl Action for AddLayerAction {
    fn execute(&mut self, document: &mut Document) -> Result<(), ActionError> {
        // Already in the document.
        let layer = self.pending.take().ok_or(ActionError::MismatchedState)?;
        document.layers.insert_layer(document.layers.len(), layer, true);
        log::debug!("added {} at top", self.id);
        document.layers.emit(Change::LayerAdded(self.id));
        Ok(())
    }
    fn undo(&mut self, document: &mut Document) -> Result<(), ActionError> {
        if self.pending.is_some() {
            return Err(ActionError::MismatchedState);
        }
        let (_, layer) = document
            .layers
            .take_layer(self.id)
            .ok_or(ActionError::UnknownLayer)?;
        self.pending = Some(layer);
        document.layers.emit(Change::LayerRemoved(self.id));
        Ok(())
    }
    fn description(&self) -> String {
        format!("add layer \"{}\"", self.name)
    }
}

/// Remove a layer. Undo puts it back where it was, active again if it was before.
#[derive(Debug)]
pub struct RemoveLayerAction {
    target: LayerID,
    /// Former index, activity and the layer itself, while removed.
    stashed: Option<(usize, bool, Layer)>,
}
impl RemoveLayerAction {
    #[must_use]
    pub fn new(target: LayerID) -> Self {
        Self {
            target,
            stashed: None,
        }
    }
    #[must_use]
    pub fn target(&self) -> LayerID {
        self.target
    }
}
impl Action for RemoveLayerAction {
    fn execute(&mut self, document: &mut Document) -> Result<(), ActionError> {
        if self.stashed.is_some() {
            return Err(ActionError::MismatchedState);
        }
        let was_active = document.layers.active_layer_id() == Some(self.target);
        let (index, layer) = document
            .layers
            .take_layer(self.target)
            .ok_or(ActionError::UnknownLayer)?;
        self.stashed = Some((index, was_active, layer));
        document.layers.emit(Change::LayerRemoved(self.target));
        Ok(())
    }
    fn undo(&mut self, document: &mut Document) -> Result<(), ActionError> {
        let (index, was_active, layer) = self.stashed.take().ok_or(ActionError::MismatchedState)?;
        document.layers.insert_layer(index, layer, was_active);
        document.layers.emit(Change::LayerAdded(self.target));
        Ok(())
    }
    fn description(&self) -> String {
        match &self.stashed {
            Some((.., layer)) => format!("remove layer \"{}\"", layer.name()),
            None => "remove layer".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}
impl MoveDirection {
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Swap a layer with its neighbour above or below.
#[derive(Debug, Clone)]
pub struct MoveLayerAction {
    target: LayerID,
    direction: MoveDirection,
}
impl MoveLayerAction {
    #[must_use]
    pub fn new(target: LayerID, direction: MoveDirection) -> Self {
        Self { target, direction }
    }
    fn step(&self, document: &mut Document, direction: MoveDirection) -> Result<(), ActionError> {
        if document.layers.index_of(self.target).is_none() {
            return Err(ActionError::UnknownLayer);
        }
        let moved = match direction {
            MoveDirection::Up => document.layers.move_layer_up(self.target),
            MoveDirection::Down => document.layers.move_layer_down(self.target),
        };
        if moved {
            Ok(())
        } else {
            Err(ActionError::NoOp)
        }
    }
}
impl Action for MoveLayerAction {
    fn execute(&mut self, document: &mut Document) -> Result<(), ActionError> {
        self.step(document, self.direction)
    }
    fn undo(&mut self, document: &mut Document) -> Result<(), ActionError> {
        self.step(document, self.direction.reverse())
    }
    fn description(&self) -> String {
        format!("move layer {}", self.direction.as_ref())
    }
}

/// Change a layer's opacity, remembering the old value for undo.
#[derive(Debug, Clone)]
pub struct SetOpacityAction {
    target: LayerID,
    opacity: f32,
    previous: Option<f32>,
}
impl SetOpacityAction {
    #[must_use]
    pub fn new(target: LayerID, opacity: f32) -> Self {
        Self {
            target,
            opacity,
            previous: None,
        }
    }
}
impl Action for SetOpacityAction {
    fn execute(&mut self, document: &mut Document) -> Result<(), ActionError> {
        let layer = document
            .layers
            .get(self.target)
            .ok_or(ActionError::UnknownLayer)?;
        let previous = layer.opacity();
        let opacity = crate::util::clamp_unit(self.opacity).ok_or(ActionError::NoOp)?;
        if opacity == previous {
            return Err(ActionError::NoOp);
        }
        document.layers.set_layer_opacity(self.target, opacity);
        self.previous = Some(previous);
        Ok(())
    }
    fn undo(&mut self, document: &mut Document) -> Result<(), ActionError> {
        let previous = self.previous.ok_or(ActionError::MismatchedState)?;
        if !document.layers.set_layer_opacity(self.target, previous) {
            return Err(ActionError::UnknownLayer);
        }
        self.previous = None;
        Ok(())
    }
    fn description(&self) -> String {
        match crate::util::clamp_unit(self.opacity) {
            Some(opacity) => format!("set layer opacity to {:.0}%", opacity * 100.0),
            None => "set layer opacity".to_owned(),
        }
    }
}

/// Change a layer's blend mode, remembering the old one for undo.
#[derive(Debug, Clone)]
pub struct SetBlendModeAction {
    target: LayerID,
    mode: BlendMode,
    previous: Option<BlendMode>,
}
impl SetBlendModeAction {
    #[must_use]
    pub fn new(target: LayerID, mode: BlendMode) -> Self {
        Self {
            target,
            mode,
            previous: None,
        }
    }
}
impl Action for SetBlendModeAction {
    fn execute(&mut self, document: &mut Document) -> Result<(), ActionError> {
        let previous = document
            .layers
            .get(self.target)
            .ok_or(ActionError::UnknownLayer)?
            .blend_mode();
        if previous == self.mode {
            return Err(ActionError::NoOp);
        }
        document.layers.set_layer_blend_mode(self.target, self.mode);
        self.previous = Some(previous);
        Ok(())
    }
    fn undo(&mut self, document: &mut Document) -> Result<(), ActionError> {
        let previous = self.previous.ok_or(ActionError::MismatchedState)?;
        if !document.layers.set_layer_blend_mode(self.target, previous) {
            return Err(ActionError::UnknownLayer);
        }
        self.previous = None;
        Ok(())
    }
    fn description(&self) -> String {
        format!("set blend mode to {}", self.mode.as_ref())
    }
}
