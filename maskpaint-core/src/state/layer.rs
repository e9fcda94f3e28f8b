//! # Layers
//!
//! A layer is an independently paintable surface: an optional imported bitmap at the bottom,
//! with freehand strokes painted over it in the order they were made.
//!
//! Each layer owns its own stroke undo/redo stacks. They are separate from the document history
//! and die with the layer.

use crate::blend::{Blend, BlendMode};
use crate::canvas::{CanvasSize, ResizeMode};
use crate::io::Bitmap;
use crate::state::transform::ResizeTransform;
use crate::stroke::StrokeData;

pub type LayerID = crate::EditorID<Layer>;

bitflags::bitflags! {
    /// Caches derived from layer content that the renderer must rebuild.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct Dirty: u8 {
        const RASTERIZE = 0b0000_0001;
        const THUMBNAIL = 0b0000_0010;
    }
}

/// An imported bitmap and where it sits on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseImage {
    bitmap: Bitmap,
    /// Display scale of the bitmap relative to its native pixels. Stretching the canvas changes
    /// this rather than resampling, so the pixels themselves are never altered.
    scale: [f32; 2],
}
impl BaseImage {
    #[must_use]
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            bitmap,
            scale: [1.0, 1.0],
        }
    }
    #[must_use]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
    #[must_use]
    pub fn scale(&self) -> [f32; 2] {
        self.scale
    }
    /// Size the bitmap occupies on the canvas, in canvas pixels.
    #[must_use]
    pub fn display_size(&self) -> [f32; 2] {
        [
            self.bitmap.width() as f32 * self.scale[0],
            self.bitmap.height() as f32 * self.scale[1],
        ]
    }
}

/// Stroke geometry and image placement of a layer, captured to be put back bit-for-bit.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LayerGeometry {
    strokes: Vec<StrokeData>,
    undone: Vec<StrokeData>,
    base_scale: Option<[f32; 2]>,
}

#[derive(Clone, Debug)]
pub struct Layer {
    id: LayerID,
    name: String,
    base_image: Option<BaseImage>,
    /// Paint order, later strokes on top.
    strokes: Vec<StrokeData>,
    /// Strokes popped by [`Self::remove_last_stroke`], most recent last.
    undone: Vec<StrokeData>,
    blend: Blend,
    locked: bool,
    visible: bool,
    active: bool,
    dirty: Dirty,
    revision: u64,
}

impl Layer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerID::default(),
            name: name.into(),
            base_image: None,
            strokes: Vec::new(),
            undone: Vec::new(),
            blend: Blend::default(),
            locked: false,
            visible: true,
            active: false,
            dirty: Dirty::empty(),
            revision: 0,
        }
    }
    #[must_use]
    pub fn with_image(name: impl Into<String>, bitmap: Bitmap) -> Self {
        let mut layer = Self::new(name);
        layer.base_image = Some(BaseImage::new(bitmap));
        layer.dirty = Dirty::all();
        layer
    }
    /// A deep copy under a fresh ID. The copy is inactive and has no stroke redo history.
    #[must_use]
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            id: LayerID::default(),
            name: name.into(),
            base_image: self.base_image.clone(),
            strokes: self.strokes.clone(),
            undone: Vec::new(),
            blend: self.blend,
            locked: self.locked,
            visible: self.visible,
            active: false,
            dirty: Dirty::all(),
            revision: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> LayerID {
        self.id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn base_image(&self) -> Option<&BaseImage> {
        self.base_image.as_ref()
    }
    #[must_use]
    pub fn strokes(&self) -> &[StrokeData] {
        &self.strokes
    }
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.strokes.is_empty() || self.base_image.is_some()
    }
    #[must_use]
    pub fn blend(&self) -> Blend {
        self.blend
    }
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.blend.opacity
    }
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend.mode
    }
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
    #[must_use]
    pub fn dirty(&self) -> Dirty {
        self.dirty
    }
    #[must_use]
    pub fn needs_rasterize(&self) -> bool {
        self.dirty.contains(Dirty::RASTERIZE)
    }
    #[must_use]
    pub fn needs_thumbnail_update(&self) -> bool {
        self.dirty.contains(Dirty::THUMBNAIL)
    }
    /// Bumped on every mutation. Compare against a remembered value to see if anything changed.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
    /// Whether a removed stroke is available to [`Self::restore_last_stroke`].
    #[must_use]
    pub fn can_restore_stroke(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Renderer finished rasterizing the current content.
    pub fn mark_rasterized(&mut self) {
        self.dirty.remove(Dirty::RASTERIZE);
    }
    /// Renderer finished regenerating the thumbnail.
    pub fn mark_thumbnail_updated(&mut self) {
        self.dirty.remove(Dirty::THUMBNAIL);
    }

    /// Append a stroke on top of the others. Returns `false` and does nothing if the layer is locked.
    pub fn add_stroke(&mut self, stroke: StrokeData) -> bool {
        if self.locked {
            log::trace!("{}: locked, stroke dropped", self.id);
            return false;
        }
        self.strokes.push(stroke);
        // A new gesture forks the stroke timeline.
        self.undone.clear();
        self.content_changed();
        true
    }
    /// Pop the most recent stroke. `None` if there are none, or the layer is locked.
    pub fn remove_last_stroke(&mut self) -> Option<StrokeData> {
        if self.locked {
            return None;
        }
        let stroke = self.strokes.pop()?;
        self.undone.push(stroke.clone());
        self.content_changed();
        Some(stroke)
    }
    /// Re-append the most recently removed stroke. Returns `false` if there is none, or the layer is locked.
    pub fn restore_last_stroke(&mut self) -> bool {
        if self.locked {
            return false;
        }
        let Some(stroke) = self.undone.pop() else {
            return false;
        };
        self.strokes.push(stroke);
        self.content_changed();
        true
    }
    /// Remove every stroke, keeping the base image. Returns `false` if the layer is locked.
    pub fn clear_strokes(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.strokes.clear();
        self.undone.clear();
        self.content_changed();
        true
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.name != name {
            self.name = name;
            self.revision += 1;
        }
    }
    /// Clamped into `[0, 1]`. NaN leaves the opacity unchanged.
    /// Returns `false` if nothing changed.
    pub fn set_opacity(&mut self, opacity: f32) -> bool {
        let Some(opacity) = crate::util::clamp_unit(opacity) else {
            log::warn!("{}: ignoring NaN opacity", self.id);
            return false;
        };
        if self.blend.opacity == opacity {
            return false;
        }
        self.blend.opacity = opacity;
        self.revision += 1;
        true
    }
    /// Returns `false` if nothing changed.
    pub fn set_blend_mode(&mut self, mode: BlendMode) -> bool {
        if self.blend.mode == mode {
            return false;
        }
        self.blend.mode = mode;
        self.revision += 1;
        true
    }
    pub fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            self.locked = locked;
            self.revision += 1;
        }
    }
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.revision += 1;
        }
    }
    /// Only the owning manager decides which layer is active.
    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Remap all geometry for a canvas size change, see [`ResizeTransform`].
    ///
    /// Runs on locked layers too: locking guards authoring, not remapping. Always dirties the
    /// layer, even when nothing moved, as its extent relative to the canvas has changed.
    pub fn transform_content(&mut self, old: CanvasSize, new: CanvasSize, mode: ResizeMode) {
        self.apply_resize(ResizeTransform::new(old, new, mode));
    }
    /// Apply an already resolved resize. See [`Self::transform_content`].
    pub fn apply_resize(&mut self, transform: ResizeTransform) {
        transform.apply(&mut self.strokes);
        // Keep redo strokes in the same space as the live ones.
        transform.apply(&mut self.undone);
        if let Some(base) = &mut self.base_image {
            let [sx, sy] = transform.point_scale();
            base.scale = [base.scale[0] * sx, base.scale[1] * sy];
        }
        self.content_changed();
    }

    pub(crate) fn geometry(&self) -> LayerGeometry {
        LayerGeometry {
            strokes: self.strokes.clone(),
            undone: self.undone.clone(),
            base_scale: self.base_image.as_ref().map(BaseImage::scale),
        }
    }
    /// Put back geometry captured by [`Self::geometry`]. Ignores the lock, like resizing.
    pub(crate) fn restore_geometry(&mut self, geometry: LayerGeometry) {
        self.strokes = geometry.strokes;
        self.undone = geometry.undone;
        if let (Some(base), Some(scale)) = (&mut self.base_image, geometry.base_scale) {
            base.scale = scale;
        }
        self.content_changed();
    }

    fn content_changed(&mut self) {
        self.dirty = Dirty::all();
        self.revision += 1;
    }
}

#[cfg(test)]
mod test {
    use super::{Dirty, Layer};
    use crate::blend::BlendMode;
    use crate::canvas::{CanvasSize, ResizeMode};
    use crate::color::Color;
    use crate::stroke::StrokeData;

    fn stroke(at: [f32; 2], size: f32) -> StrokeData {
        StrokeData::paint(vec![at], size, Color::BLACK).unwrap()
    }
    fn size(w: u32, h: u32) -> CanvasSize {
        CanvasSize::new(w, h).unwrap()
    }

    #[test]
    fn new_layer_is_empty() {
        let layer = Layer::new("Layer 1");
        assert!(!layer.has_content());
        assert_eq!(layer.opacity(), 1.0);
        assert_eq!(layer.blend_mode(), BlendMode::Normal);
        assert!(!layer.is_locked());
        assert!(layer.is_visible());
        assert_eq!(layer.dirty(), Dirty::empty());
    }
    #[test]
    fn ids_unique() {
        assert_ne!(Layer::new("a").id(), Layer::new("a").id());
    }
    #[test]
    fn add_then_remove_round_trips() {
        let mut layer = Layer::new("l");
        let first = stroke([1.0, 1.0], 2.0);
        let second = stroke([5.0, 5.0], 3.0);
        assert!(layer.add_stroke(first.clone()));
        assert!(layer.add_stroke(second.clone()));
        assert!(layer.needs_rasterize());
        assert!(layer.needs_thumbnail_update());

        assert_eq!(layer.remove_last_stroke(), Some(second));
        assert_eq!(layer.strokes(), &[first]);
    }
    #[test]
    fn remove_from_empty() {
        let mut layer = Layer::new("l");
        assert_eq!(layer.remove_last_stroke(), None);
        assert_eq!(layer.dirty(), Dirty::empty());
    }
    #[test]
    fn locked_is_noop() {
        let mut layer = Layer::new("l");
        layer.add_stroke(stroke([1.0, 1.0], 2.0));
        layer.set_locked(true);
        layer.mark_rasterized();
        layer.mark_thumbnail_updated();

        assert!(!layer.add_stroke(stroke([2.0, 2.0], 2.0)));
        assert_eq!(layer.stroke_count(), 1);
        assert_eq!(layer.remove_last_stroke(), None);
        assert!(!layer.clear_strokes());
        assert_eq!(layer.stroke_count(), 1);
        assert_eq!(layer.dirty(), Dirty::empty());
    }
    #[test]
    fn restore_stroke() {
        let mut layer = Layer::new("l");
        let painted = stroke([1.0, 1.0], 2.0);
        layer.add_stroke(painted.clone());
        layer.remove_last_stroke();
        assert!(layer.can_restore_stroke());
        assert!(layer.restore_last_stroke());
        assert_eq!(layer.strokes(), &[painted]);
        assert!(!layer.restore_last_stroke());

        // A new stroke discards the redo stack.
        layer.remove_last_stroke();
        layer.add_stroke(stroke([9.0, 9.0], 1.0));
        assert!(!layer.can_restore_stroke());
    }
    #[test]
    fn clear_keeps_base_image() {
        let bitmap = crate::io::Bitmap::from(image::RgbaImage::new(4, 4));
        let mut layer = Layer::with_image("img", bitmap);
        layer.add_stroke(stroke([1.0, 1.0], 2.0));
        layer.mark_rasterized();
        assert!(layer.clear_strokes());
        assert_eq!(layer.stroke_count(), 0);
        assert!(layer.base_image().is_some());
        assert!(layer.has_content());
        assert!(layer.needs_rasterize());
    }
    #[test]
    fn opacity_clamped() {
        let mut layer = Layer::new("l");
        assert!(layer.set_opacity(-3.0));
        assert_eq!(layer.opacity(), 0.0);
        assert!(layer.set_opacity(7.0));
        assert_eq!(layer.opacity(), 1.0);
        assert!(!layer.set_opacity(f32::NAN));
        assert_eq!(layer.opacity(), 1.0);
        assert!(!layer.set_opacity(1.0));
    }
    #[test]
    fn transform_always_dirties() {
        let mut layer = Layer::new("l");
        layer.transform_content(size(10, 10), size(5, 5), ResizeMode::Crop);
        assert_eq!(layer.dirty(), Dirty::all());
    }
    #[test]
    fn transform_locked_layer() {
        let mut layer = Layer::new("l");
        layer.add_stroke(stroke([100.0, 100.0], 10.0));
        layer.set_locked(true);
        layer.transform_content(size(1024, 1024), size(2048, 2048), ResizeMode::Stretch);
        assert_eq!(layer.strokes()[0].points(), &[[200.0, 200.0]]);
        assert_eq!(layer.strokes()[0].size(), 20.0);
    }
    #[test]
    fn transform_reaches_redo_stack_and_image() {
        let bitmap = crate::io::Bitmap::from(image::RgbaImage::new(8, 4));
        let mut layer = Layer::with_image("img", bitmap);
        layer.add_stroke(stroke([10.0, 10.0], 2.0));
        layer.remove_last_stroke();
        layer.transform_content(size(100, 100), size(200, 50), ResizeMode::Stretch);
        assert!(layer.restore_last_stroke());
        assert_eq!(layer.strokes()[0].points(), &[[20.0, 5.0]]);
        let base = layer.base_image().unwrap();
        assert_eq!(base.scale(), [2.0, 0.5]);
        assert_eq!(base.display_size(), [16.0, 2.0]);
    }
    #[test]
    fn geometry_restores_exactly() {
        let bitmap = crate::io::Bitmap::from(image::RgbaImage::new(8, 4));
        let mut layer = Layer::with_image("img", bitmap);
        layer.add_stroke(stroke([10.0, 10.0], 7.0));
        layer.add_stroke(stroke([3.0, 9.0], 2.0));
        layer.remove_last_stroke();
        let saved = layer.geometry();
        layer.set_locked(true);
        layer.transform_content(size(1024, 768), size(1000, 700), ResizeMode::Stretch);
        assert_ne!(layer.geometry(), saved);
        layer.mark_rasterized();

        layer.restore_geometry(saved.clone());
        assert_eq!(layer.geometry(), saved);
        assert_eq!(layer.base_image().unwrap().scale(), [1.0, 1.0]);
        assert!(layer.needs_rasterize());
    }
    #[test]
    fn duplicate_is_deep() {
        let mut layer = Layer::new("l");
        layer.add_stroke(stroke([1.0, 1.0], 2.0));
        layer.set_blend_mode(BlendMode::Screen);
        let copy = layer.duplicate("l copy");
        assert_ne!(copy.id(), layer.id());
        assert_eq!(copy.strokes(), layer.strokes());
        assert_eq!(copy.blend(), layer.blend());
        assert_eq!(copy.name(), "l copy");
        assert!(!copy.is_active());
    }
}
