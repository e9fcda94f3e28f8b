use crate::util::{FiniteF32, FiniteF32Error};

/// A straight (non-premultiplied) RGBA color, each channel nominally in `[0, 1]`.
///
/// Channels are only required to be finite; HDR values above one are kept as-is.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct Color([FiniteF32; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        Ok(Self([
            FiniteF32::new(r)?,
            FiniteF32::new(g)?,
            FiniteF32::new(b)?,
            FiniteF32::new(a)?,
        ]))
    }
    pub fn from_array([r, g, b, a]: [f32; 4]) -> Result<Self, FiniteF32Error> {
        Self::new(r, g, b, a)
    }
    /// Convert from 8-bit-per-channel RGBA. Infallible, every byte maps to a finite value.
    #[must_use]
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        let channel = |byte: u8| FiniteF32::new(f32::from(byte) / 255.0).unwrap_or(FiniteF32::ZERO);
        Self(rgba.map(channel))
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0.map(FiniteF32::get)
    }
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.0[3].get()
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
