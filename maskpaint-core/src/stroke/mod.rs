//! # Strokes
//!
//! A [`StrokeData`] records one continuous brush or eraser gesture: the polyline the pointer
//! traced, and the paint parameters it was traced with. Strokes are immutable once built. The
//! only thing allowed to touch their geometry afterwards is the canvas resize transform.

use crate::color::Color;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeError {
    #[error("a stroke needs at least one point")]
    NoPoints,
    #[error("brush size must be greater than zero")]
    InvalidSize,
    #[error("stroke contains a non-finite coordinate or parameter")]
    NotFinite,
}

/// Axis-aligned rectangle in layer pixel space. `min` is top-left.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Bounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

#[derive(Clone, PartialEq, Debug)]
pub struct StrokeData {
    /// Layer-local pixel coordinates. Never empty.
    points: Vec<[f32; 2]>,
    /// Brush diameter in pixels.
    size: f32,
    color: Color,
    opacity: f32,
    hardness: f32,
    is_eraser: bool,
}
impl StrokeData {
    /// Record a gesture. `opacity` and `hardness` are clamped into `[0, 1]`.
    pub fn new(
        points: Vec<[f32; 2]>,
        size: f32,
        color: Color,
        opacity: f32,
        hardness: f32,
        is_eraser: bool,
    ) -> Result<Self, StrokeError> {
        if points.is_empty() {
            return Err(StrokeError::NoPoints);
        }
        if points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(StrokeError::NotFinite);
        }
        if !size.is_finite() {
            return Err(StrokeError::NotFinite);
        }
        if size <= 0.0 {
            return Err(StrokeError::InvalidSize);
        }
        let opacity = crate::util::clamp_unit(opacity).ok_or(StrokeError::NotFinite)?;
        let hardness = crate::util::clamp_unit(hardness).ok_or(StrokeError::NotFinite)?;
        Ok(Self {
            points,
            size,
            color,
            opacity,
            hardness,
            is_eraser,
        })
    }
    /// A fully opaque, fully hard paint stroke.
    pub fn paint(points: Vec<[f32; 2]>, size: f32, color: Color) -> Result<Self, StrokeError> {
        Self::new(points, size, color, 1.0, 1.0, false)
    }
    /// A fully opaque, fully hard eraser stroke.
    pub fn eraser(points: Vec<[f32; 2]>, size: f32) -> Result<Self, StrokeError> {
        Self::new(points, size, Color::TRANSPARENT, 1.0, 1.0, true)
    }
    #[must_use]
    pub fn points(&self) -> &[[f32; 2]] {
        &self.points
    }
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }
    #[must_use]
    pub fn hardness(&self) -> f32 {
        self.hardness
    }
    #[must_use]
    pub fn is_eraser(&self) -> bool {
        self.is_eraser
    }
    /// Area the stroke can touch: the bounding box of its points, grown by the brush radius.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let radius = self.size / 2.0;
        let mut min = [f32::INFINITY; 2];
        let mut max = [f32::NEG_INFINITY; 2];
        for &[x, y] in &self.points {
            min = [min[0].min(x), min[1].min(y)];
            max = [max[0].max(x), max[1].max(y)];
        }
        Bounds {
            min: [min[0] - radius, min[1] - radius],
            max: [max[0] + radius, max[1] + radius],
        }
    }
    /// Scale every point per-axis and the brush by `size_scale`.
    pub(crate) fn rescale(&mut self, [sx, sy]: [f32; 2], size_scale: f32) {
        for [x, y] in &mut self.points {
            *x *= sx;
            *y *= sy;
        }
        self.size *= size_scale;
    }
}
