//! # Layer stack
//!
//! [`LayerManager`] owns every layer of a document in z-order, index 0 at the bottom. It tracks
//! which single layer (if any) is active and announces each mutation on its [`ChangeSignal`].
//!
//! Operations that name a layer which doesn't exist, or that can't go any further (moving the top
//! layer up), return `false`/`None` and leave everything untouched, including the signal.

use crate::blend::BlendMode;
use crate::canvas::{CanvasSize, ResizeMode};
use crate::io::{Bitmap, DecodeError};
use crate::notify::{Change, ChangeSignal};
use crate::state::layer::{Layer, LayerGeometry, LayerID};
use crate::state::transform::ResizeTransform;
use crate::stroke::StrokeData;

/// Every layer's geometry from before a resize, with the revision each layer had right after it.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResizeSnapshot {
    layers: std::collections::BTreeMap<LayerID, (u64, LayerGeometry)>,
}

#[derive(Default, Debug)]
pub struct LayerManager {
    /// Bottom to top.
    layers: Vec<Layer>,
    signal: ChangeSignal,
    /// Last composite handed over by the renderer. Dropped on every emitted change.
    composite: Option<Bitmap>,
    composite_invalidations: u64,
}

// Queries
impl LayerManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
    /// Iterate bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> + ExactSizeIterator + '_ {
        self.layers.iter()
    }
    #[must_use]
    pub fn get(&self, id: LayerID) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }
    /// Mutable access bypassing notifications.
    pub(crate) fn get_mut(&mut self, id: LayerID) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }
    #[must_use]
    pub fn index_of(&self, id: LayerID) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id() == id)
    }
    #[must_use]
    pub fn active_layer(&self) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.is_active())
    }
    #[must_use]
    pub fn active_layer_id(&self) -> Option<LayerID> {
        self.active_layer().map(Layer::id)
    }
    #[must_use]
    pub fn signal(&self) -> &ChangeSignal {
        &self.signal
    }
    pub fn signal_mut(&mut self) -> &mut ChangeSignal {
        &mut self.signal
    }
    /// The cached composite, if the renderer stored one and nothing changed since.
    #[must_use]
    pub fn composite(&self) -> Option<&Bitmap> {
        self.composite.as_ref()
    }
    pub fn store_composite(&mut self, composite: Bitmap) {
        self.composite = Some(composite);
    }
    /// Number of times the composite slot has been invalidated, one per emitted change.
    #[must_use]
    pub fn composite_invalidations(&self) -> u64 {
        self.composite_invalidations
    }
}

// Structural edits
impl LayerManager {
    /// Push a new empty layer on top of the stack and make it active.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerID {
        self.push_active(Layer::new(name))
    }
    /// Decode `bytes` into a new active layer on top of the stack.
    ///
    /// On failure, returns `None` and the stack is untouched. Use
    /// [`Self::try_add_layer_from_image`] to find out why.
    pub fn add_layer_from_image(&mut self, bytes: &[u8], name: impl Into<String>) -> Option<LayerID> {
        match self.try_add_layer_from_image(bytes, name) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("image import failed: {err}");
                None
            }
        }
    }
    /// As [`Self::add_layer_from_image`], reporting why decoding failed.
    pub fn try_add_layer_from_image(
        &mut self,
        bytes: &[u8],
        name: impl Into<String>,
    ) -> Result<LayerID, DecodeError> {
        // Decode entirely before touching the stack.
        let bitmap = crate::io::decode(bytes)?;
        Ok(self.add_layer_from_bitmap(bitmap, name))
    }
    /// Push an already decoded bitmap as a new active layer.
    pub fn add_layer_from_bitmap(&mut self, bitmap: Bitmap, name: impl Into<String>) -> LayerID {
        self.push_active(Layer::with_image(name, bitmap))
    }
    /// Remove a layer. If it was active, the layer below it becomes active (or the new
    /// bottom layer, if it was the bottom).
    pub fn remove_layer(&mut self, id: LayerID) -> bool {
        let Some((_, layer)) = self.take_layer(id) else {
            return false;
        };
        self.emit(Change::LayerRemoved(layer.id()));
        true
    }
    /// Copy a layer to directly above itself, and make the copy active.
    pub fn duplicate_layer(&mut self, id: LayerID) -> Option<LayerID> {
        let index = self.index_of(id)?;
        let source = &self.layers[index];
        let copy = source.duplicate(format!("{} copy", source.name()));
        let copy_id = copy.id();
        self.insert_layer(index + 1, copy, true);
        log::debug!("duplicated {id} as {copy_id}");
        self.emit(Change::LayerAdded(copy_id));
        Some(copy_id)
    }
    /// Swap with the layer above. `false` if already on top.
    pub fn move_layer_up(&mut self, id: LayerID) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        if from + 1 >= self.layers.len() {
            return false;
        }
        self.swap(id, from, from + 1);
        true
    }
    /// Swap with the layer below. `false` if already at the bottom.
    pub fn move_layer_down(&mut self, id: LayerID) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        if from == 0 {
            return false;
        }
        self.swap(id, from, from - 1);
        true
    }
    /// Make a layer the single active one.
    pub fn set_active_layer(&mut self, id: LayerID) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        if self.active_layer_id() == Some(id) {
            return true;
        }
        self.activate(Some(id));
        self.emit(Change::ActiveLayer(Some(id)));
        true
    }
    /// Apply a canvas size change to every layer as one operation: a single change is
    /// emitted and the composite is invalidated once, however many layers there are.
    pub fn transform_all_layers(&mut self, old: CanvasSize, new: CanvasSize, mode: ResizeMode) {
        self.resize_all(ResizeTransform::new(old, new, mode), old, new, mode);
    }
    /// Undo a previous `transform_all_layers(old, new, mode)`: content is mapped from `new`
    /// back to `old` with the inverse mode. Emits once, like the forward transform.
    pub fn revert_transform_all_layers(&mut self, old: CanvasSize, new: CanvasSize, mode: ResizeMode) {
        self.resize_all(
            ResizeTransform::reverse(old, new, mode),
            new,
            old,
            mode.inverse(),
        );
    }
    /// Run several edits as one logical operation. Their changes are emitted together, once,
    /// when `edit` returns.
    pub fn batch<F, T>(&mut self, edit: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        self.signal.hold();
        let result = edit(self);
        if self.signal.release() {
            self.invalidate_composite();
        }
        result
    }
}

// Delegates to a single layer
impl LayerManager {
    pub fn set_layer_opacity(&mut self, id: LayerID, opacity: f32) -> bool {
        self.edit_properties(id, |layer| {
            layer.set_opacity(opacity);
        })
    }
    pub fn set_layer_blend_mode(&mut self, id: LayerID, mode: BlendMode) -> bool {
        self.edit_properties(id, |layer| {
            layer.set_blend_mode(mode);
        })
    }
    pub fn toggle_lock(&mut self, id: LayerID) -> bool {
        self.edit_properties(id, |layer| layer.set_locked(!layer.is_locked()))
    }
    pub fn set_layer_visible(&mut self, id: LayerID, visible: bool) -> bool {
        self.edit_properties(id, |layer| layer.set_visible(visible))
    }
    pub fn rename_layer(&mut self, id: LayerID, name: impl Into<String>) -> bool {
        let name = name.into();
        self.edit_properties(id, |layer| layer.rename(name))
    }
    /// Paint onto a layer. Not recorded in the document history: undo it with
    /// [`Self::remove_last_stroke_from_layer`]. `false` if the layer is missing or locked.
    pub fn add_stroke_to_layer(&mut self, id: LayerID, stroke: StrokeData) -> bool {
        self.edit_content(id, |layer| layer.add_stroke(stroke))
    }
    pub fn remove_last_stroke_from_layer(&mut self, id: LayerID) -> Option<StrokeData> {
        let stroke = self.get_mut(id)?.remove_last_stroke()?;
        self.emit(Change::LayerContent(id));
        Some(stroke)
    }
    pub fn restore_last_stroke_to_layer(&mut self, id: LayerID) -> bool {
        self.edit_content(id, Layer::restore_last_stroke)
    }
    pub fn clear_layer(&mut self, id: LayerID) -> bool {
        self.edit_content(id, Layer::clear_strokes)
    }
}

// Plumbing, also used by history actions to stash and restore whole layers.
impl LayerManager {
    /// Detach a layer from the stack, returning its former index. Re-inserting it with
    /// [`Self::insert_layer`] restores it exactly, ID included. Does not emit.
    pub(crate) fn take_layer(&mut self, id: LayerID) -> Option<(usize, Layer)> {
        let index = self.index_of(id)?;
        let mut layer = self.layers.remove(index);
        if layer.is_active() {
            layer.set_active(false);
            // Prefer the layer that was directly below.
            let next = index.checked_sub(1).or((!self.layers.is_empty()).then_some(0));
            if let Some(next) = next {
                self.layers[next].set_active(true);
            }
        }
        log::debug!("removed {id} from index {index}");
        Some((index, layer))
    }
    /// Insert a layer at `index` (clamped to the top), optionally making it the active one. Does not emit.
    pub(crate) fn insert_layer(&mut self, index: usize, mut layer: Layer, activate: bool) {
        let index = index.min(self.layers.len());
        layer.set_active(false);
        let id = layer.id();
        self.layers.insert(index, layer);
        if activate {
            self.activate(Some(id));
        }
    }
    /// As [`Self::transform_all_layers`], returning what [`Self::revert_resize`] needs to
    /// undo it exactly.
    pub(crate) fn transform_all_layers_recorded(
        &mut self,
        old: CanvasSize,
        new: CanvasSize,
        mode: ResizeMode,
    ) -> ResizeSnapshot {
        let before: Vec<_> = self
            .layers
            .iter()
            .map(|layer| (layer.id(), layer.geometry()))
            .collect();
        self.transform_all_layers(old, new, mode);
        let layers = before
            .into_iter()
            .filter_map(|(id, geometry)| Some((id, (self.get(id)?.revision(), geometry))))
            .collect();
        ResizeSnapshot { layers }
    }
    /// Undo a recorded `transform_all_layers(old, new, mode)`. Layers untouched since then get
    /// their exact former geometry back. Layers edited or added since are mapped back with
    /// [`ResizeTransform::reverse`] instead. Emits once.
    pub(crate) fn revert_resize(
        &mut self,
        snapshot: ResizeSnapshot,
        old: CanvasSize,
        new: CanvasSize,
        mode: ResizeMode,
    ) {
        let mut saved = snapshot.layers;
        let fallback = ResizeTransform::reverse(old, new, mode);
        log::debug!(
            "reverting resize of {} layers {new} -> {old} ({})",
            self.layers.len(),
            mode.as_ref()
        );
        for layer in &mut self.layers {
            let exact = saved
                .remove(&layer.id())
                .filter(|(revision, _)| *revision == layer.revision());
            match exact {
                Some((_, geometry)) => layer.restore_geometry(geometry),
                None => {
                    log::trace!("{} changed since resize, mapping back", layer.id());
                    layer.apply_resize(fallback);
                }
            }
        }
        self.emit(Change::Transformed {
            from: new,
            to: old,
            mode: mode.inverse(),
        });
    }
    /// Emit a change and drop the cached composite.
    pub(crate) fn emit(&mut self, change: Change) {
        if self.signal.emit(change) {
            self.invalidate_composite();
        }
    }
    fn invalidate_composite(&mut self) {
        self.composite = None;
        self.composite_invalidations += 1;
    }
    fn resize_all(
        &mut self,
        transform: ResizeTransform,
        from: CanvasSize,
        to: CanvasSize,
        mode: ResizeMode,
    ) {
        log::debug!(
            "resizing {} layers {from} -> {to} ({})",
            self.layers.len(),
            mode.as_ref()
        );
        for layer in &mut self.layers {
            layer.apply_resize(transform);
        }
        self.emit(Change::Transformed { from, to, mode });
    }
    fn push_active(&mut self, layer: Layer) -> LayerID {
        let id = layer.id();
        self.insert_layer(self.layers.len(), layer, true);
        log::debug!("added {id} at top ({} layers)", self.layers.len());
        self.emit(Change::LayerAdded(id));
        id
    }
    fn activate(&mut self, id: Option<LayerID>) {
        for layer in &mut self.layers {
            layer.set_active(Some(layer.id()) == id);
        }
    }
    fn swap(&mut self, id: LayerID, from: usize, to: usize) {
        self.layers.swap(from, to);
        log::debug!("moved {id} from {from} to {to}");
        self.emit(Change::LayerMoved {
            target: id,
            from,
            to,
        });
    }
    fn edit_properties(&mut self, id: LayerID, edit: impl FnOnce(&mut Layer)) -> bool {
        let Some(layer) = self.get_mut(id) else {
            return false;
        };
        let before = layer.revision();
        edit(layer);
        if layer.revision() != before {
            self.emit(Change::LayerProperties(id));
        }
        true
    }
    fn edit_content(&mut self, id: LayerID, edit: impl FnOnce(&mut Layer) -> bool) -> bool {
        let Some(layer) = self.get_mut(id) else {
            return false;
        };
        if !edit(layer) {
            return false;
        }
        self.emit(Change::LayerContent(id));
        true
    }
}
