//! # Canvas resize transform
//!
//! Remaps stroke geometry when the canvas changes size. Crop and pad are anchored at the
//! top-left corner and leave coordinates alone; stretch scales each axis by the ratio of the
//! new size to the old one. The brush has no single natural axis, so its diameter is scaled by
//! the mean of the two axis ratios.

use crate::canvas::{CanvasSize, ResizeMode};
use crate::stroke::StrokeData;

/// A resolved resize, ready to apply to any number of strokes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResizeTransform {
    /// Per-axis point scale. `[1.0, 1.0]` for anything but a real stretch.
    scale: [f32; 2],
    /// Brush diameter scale.
    size_scale: f32,
}

impl ResizeTransform {
    #[must_use]
    pub fn new(old: CanvasSize, new: CanvasSize, mode: ResizeMode) -> Self {
        let scale = match mode {
            ResizeMode::Crop | ResizeMode::Pad => [1.0, 1.0],
            // Same size must be exactly identity, not "one-ish".
            ResizeMode::Stretch if old == new => [1.0, 1.0],
            ResizeMode::Stretch => new.scale_from(old),
        };
        Self {
            scale,
            size_scale: (scale[0] + scale[1]) / 2.0,
        }
    }
    /// The transform that puts content back after `Self::new(old, new, mode)`.
    ///
    /// Points are mapped with the sizes swapped. The brush is scaled by the reciprocal of the
    /// forward factor: for a non-uniform stretch the mean of the inverted axis ratios is not
    /// the inverse of their mean, and brushes would drift on every undo.
    #[must_use]
    pub fn reverse(old: CanvasSize, new: CanvasSize, mode: ResizeMode) -> Self {
        let forward = Self::new(old, new, mode);
        if forward.is_identity() {
            return forward;
        }
        Self {
            scale: old.scale_from(new),
            size_scale: 1.0 / forward.size_scale,
        }
    }
    #[must_use]
    pub fn identity() -> Self {
        Self {
            scale: [1.0, 1.0],
            size_scale: 1.0,
        }
    }
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.scale == [1.0, 1.0] && self.size_scale == 1.0
    }
    #[must_use]
    pub fn point_scale(&self) -> [f32; 2] {
        self.scale
    }
    /// Factor applied to brush diameters.
    #[must_use]
    pub fn size_scale(&self) -> f32 {
        self.size_scale
    }
    #[must_use]
    pub fn apply_point(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        [x * self.scale[0], y * self.scale[1]]
    }
    /// Remap every stroke in place. Eraser strokes are scaled exactly like paint strokes.
    pub fn apply(&self, strokes: &mut [StrokeData]) {
        if self.is_identity() {
            return;
        }
        for stroke in strokes {
            stroke.rescale(self.scale, self.size_scale);
        }
    }
}
impl Default for ResizeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod test {
    use super::ResizeTransform;
    use crate::canvas::{CanvasSize, ResizeMode};
    use crate::color::Color;
    use crate::stroke::StrokeData;

    fn size(w: u32, h: u32) -> CanvasSize {
        CanvasSize::new(w, h).unwrap()
    }
    fn strokes() -> Vec<StrokeData> {
        vec![
            StrokeData::paint(vec![[100.0, 100.0]], 10.0, Color::BLACK).unwrap(),
            StrokeData::paint(vec![[0.5, 3.25], [1023.0, 7.0]], 2.5, Color::WHITE).unwrap(),
            StrokeData::eraser(vec![[512.0, 384.0]], 7.0).unwrap(),
        ]
    }

    #[test]
    fn stretch_doubles() {
        let mut strokes = strokes();
        ResizeTransform::new(size(1024, 1024), size(2048, 2048), ResizeMode::Stretch)
            .apply(&mut strokes);
        assert_eq!(strokes[0].points(), &[[200.0, 200.0]]);
        assert_eq!(strokes[0].size(), 20.0);
    }
    #[test]
    fn stretch_matches_formula() {
        let (old, new) = (size(1024, 768), size(300, 1000));
        let original = strokes();
        let mut strokes = original.clone();
        ResizeTransform::new(old, new, ResizeMode::Stretch).apply(&mut strokes);

        let sx = 300.0f32 / 1024.0;
        let sy = 1000.0f32 / 768.0;
        for (before, after) in original.iter().zip(&strokes) {
            for (&[x, y], &[nx, ny]) in before.points().iter().zip(after.points()) {
                assert_eq!(nx, x * sx);
                assert_eq!(ny, y * sy);
            }
            assert_eq!(after.size(), before.size() * ((sx + sy) / 2.0));
        }
    }
    #[test]
    fn aspect_swap() {
        let mut strokes = strokes();
        ResizeTransform::new(size(1024, 768), size(768, 1024), ResizeMode::Stretch)
            .apply(&mut strokes);
        let [x, y] = strokes[2].points()[0];
        assert!((x - 384.0).abs() < 1e-3);
        assert!((y - 512.0).abs() < 1e-3);
        let expected = 7.0 * ((0.75 + 1024.0 / 768.0) / 2.0);
        assert!((strokes[2].size() - expected).abs() < 1e-4);
    }
    #[test]
    fn crop_and_pad_are_identity() {
        for mode in [ResizeMode::Crop, ResizeMode::Pad] {
            for (old, new) in [
                (size(1024, 1024), size(10, 3000)),
                (size(7, 9), size(4096, 1)),
            ] {
                let original = strokes();
                let mut strokes = original.clone();
                ResizeTransform::new(old, new, mode).apply(&mut strokes);
                assert_eq!(original, strokes);
            }
        }
    }
    #[test]
    fn same_size_is_identity() {
        let transform = ResizeTransform::new(size(333, 777), size(333, 777), ResizeMode::Stretch);
        assert!(transform.is_identity());
        let original = strokes();
        let mut strokes = original.clone();
        transform.apply(&mut strokes);
        assert_eq!(original, strokes);
    }
    #[test]
    fn reverse_undoes_uniform_exactly() {
        let (old, new) = (size(1024, 1024), size(2048, 2048));
        let original = strokes();
        let mut strokes = original.clone();
        ResizeTransform::new(old, new, ResizeMode::Stretch).apply(&mut strokes);
        ResizeTransform::reverse(old, new, ResizeMode::Stretch).apply(&mut strokes);
        assert_eq!(original, strokes);
    }
    #[test]
    fn reverse_restores_brush_after_uneven_stretch() {
        let (old, new) = (size(1024, 512), size(4096, 256));
        let original = strokes();
        let mut strokes = original.clone();
        ResizeTransform::new(old, new, ResizeMode::Stretch).apply(&mut strokes);
        ResizeTransform::reverse(old, new, ResizeMode::Stretch).apply(&mut strokes);
        for (before, after) in original.iter().zip(&strokes) {
            // Axis ratios are powers of two, so points come back exactly.
            assert_eq!(before.points(), after.points());
            assert!((before.size() - after.size()).abs() < 1e-5);
        }
    }
    #[test]
    fn reverse_of_crop_is_identity() {
        assert!(ResizeTransform::reverse(size(10, 10), size(3, 3), ResizeMode::Crop).is_identity());
    }
    #[test]
    fn empty_is_fine() {
        ResizeTransform::new(size(1, 1), size(5, 5), ResizeMode::Stretch).apply(&mut []);
    }
}
