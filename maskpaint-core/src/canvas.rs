//! # Canvas
//! Canvas dimensions and the policies used when they change.

/// Size of the document canvas in whole pixels. Both axes are non-zero.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CanvasSize {
    width: u32,
    height: u32,
}
impl CanvasSize {
    pub const DEFAULT: Self = Self {
        width: 1024,
        height: 1024,
    };
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasSizeError> {
        if width == 0 || height == 0 {
            Err(CanvasSizeError::Degenerate { width, height })
        } else {
            Ok(Self { width, height })
        }
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Per-axis ratio `self / from`, the factors that map `from`-space onto `self`-space.
    #[must_use]
    pub fn scale_from(&self, from: CanvasSize) -> [f32; 2] {
        [
            self.width as f32 / from.width as f32,
            self.height as f32 / from.height as f32,
        ]
    }
}
impl std::fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasSizeError {
    #[error("canvas size {width}x{height} has a zero-length axis")]
    Degenerate { width: u32, height: u32 },
}

/// How existing content responds to a change of canvas size.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Shrink the bounds, anchored top-left. Content outside is clipped at render time, never deleted.
    Crop,
    /// Grow the bounds, anchored top-left. Content does not move.
    Pad,
    /// Rescale content so it fills the new bounds.
    Stretch,
}
impl ResizeMode {
    /// The mode which, applied with the sizes swapped, puts content back where it was.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::Crop => Self::Pad,
            Self::Pad => Self::Crop,
            Self::Stretch => Self::Stretch,
        }
    }
}
