//! Small numeric helpers shared by strokes, colors, and layers.

/// A float which is never NaN or infinite.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}
impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}
// No component is ever NaN, so equality is reflexive.
impl Eq for FiniteF32 {}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
}

/// Clamp into `[0, 1]`. NaN has no sensible position in the range and is reported as `None`.
#[must_use]
pub fn clamp_unit(val: f32) -> Option<f32> {
    if val.is_nan() {
        None
    } else {
        Some(val.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod test {
    use super::{clamp_unit, FiniteF32, FiniteF32Error};
    #[test]
    fn rejects_non_finite() {
        assert_eq!(FiniteF32::new(f32::NAN), Err(FiniteF32Error::NotFinite));
        assert_eq!(FiniteF32::new(f32::INFINITY), Err(FiniteF32Error::NotFinite));
        assert_eq!(FiniteF32::new(0.5).map(FiniteF32::get), Ok(0.5));
    }
    #[test]
    fn clamps() {
        assert_eq!(clamp_unit(-1.0), Some(0.0));
        assert_eq!(clamp_unit(2.0), Some(1.0));
        assert_eq!(clamp_unit(0.25), Some(0.25));
        assert_eq!(clamp_unit(f32::INFINITY), Some(1.0));
        assert_eq!(clamp_unit(f32::NAN), None);
    }
}
