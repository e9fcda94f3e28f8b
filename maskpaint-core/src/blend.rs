/// Per-pixel compositing function used to merge a layer with the layers beneath it.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumString,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

/// Blend settings of a layer: the mode and the opacity it is composited with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Blend {
    pub mode: BlendMode,
    /// `[0, 1]`
    pub opacity: f32,
}
impl Default for Blend {
    fn default() -> Self {
        Self {
            mode: BlendMode::default(),
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::BlendMode;
    use strum::IntoEnumIterator;
    #[test]
    fn twelve_modes() {
        assert_eq!(BlendMode::iter().count(), 12);
        assert_eq!(BlendMode::default(), BlendMode::Normal);
    }
    #[test]
    fn names_round_trip() {
        for mode in BlendMode::iter() {
            let parsed: BlendMode = mode.as_ref().parse().unwrap();
            assert_eq!(parsed, mode);
        }
        assert_eq!(BlendMode::ColorDodge.as_ref(), "colorDodge");
    }
}
