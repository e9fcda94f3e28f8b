//! # Bitmap import
//!
//! The single ingress point from encoded image files. Bytes go in, a fully decoded
//! straight-alpha RGBA8 bitmap comes out, or a [`DecodeError`] says why not.

/// Encoded formats accepted by [`decode`].
pub const SUPPORTED_FORMATS: [image::ImageFormat; 3] = [
    image::ImageFormat::Png,
    image::ImageFormat::Jpeg,
    image::ImageFormat::Bmp,
];

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("no image data")]
    Empty,
    #[error("unrecognized or unsupported image format")]
    Unsupported,
    #[error("image data is corrupt: {0}")]
    Corrupt(#[source] image::ImageError),
}

/// Decoded RGBA8 pixels, non-premultiplied, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap(image::RgbaImage);
impl Bitmap {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }
    #[must_use]
    pub fn dimensions(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }
    /// Fetch a pixel as `[r, g, b, a]`. `None` if out-of-bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.0.get_pixel(x, y).0)
    }
    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(self.0.as_raw())
    }
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }
    /// Whether any pixel is less than fully opaque.
    #[must_use]
    pub fn has_transparency(&self) -> bool {
        self.pixels().iter().any(|[.., a]| *a != u8::MAX)
    }
}
impl From<image::RgbaImage> for Bitmap {
    fn from(value: image::RgbaImage) -> Self {
        Self(value)
    }
}
impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

/// Decode an encoded image.
///
/// # Errors
/// * [`DecodeError::Empty`] for zero-length input.
/// * [`DecodeError::Unsupported`] if the format can't be identified or isn't one of [`SUPPORTED_FORMATS`].
/// * [`DecodeError::Corrupt`] if the format was identified but the data failed to decode.
pub fn decode(bytes: &[u8]) -> Result<Bitmap, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let format = image::guess_format(bytes).map_err(|_| DecodeError::Unsupported)?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(DecodeError::Unsupported);
    }
    let decoded = image::load_from_memory_with_format(bytes, format).map_err(|err| match err {
        image::ImageError::Unsupported(_) => DecodeError::Unsupported,
        other => DecodeError::Corrupt(other),
    })?;
    log::trace!(
        "decoded {format:?} {}x{}",
        decoded.width(),
        decoded.height()
    );
    // Always expand to RGBA so alpha survives regardless of source layout.
    Ok(Bitmap(decoded.into_rgba8()))
}

#[cfg(test)]
pub(crate) mod test {
    use super::{decode, Bitmap, DecodeError};

    /// 2x2 PNG, top-left pixel half transparent red, the rest opaque blue.
    pub(crate) fn png_bytes() -> Vec<u8> {
        let mut image = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255]));
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }
    /// 8x8 solid grey JPEG.
    pub(crate) fn jpeg_bytes() -> Vec<u8> {
        let image = image::RgbImage::from_pixel(8, 8, image::Rgb([128, 128, 128]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut bytes, image::ImageFormat::Jpeg)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn empty_fails() {
        assert!(matches!(decode(&[]), Err(DecodeError::Empty)));
    }
    #[test]
    fn garbage_fails() {
        assert!(matches!(
            decode(&[0xde, 0xad, 0xbe, 0xef]),
            Err(DecodeError::Unsupported)
        ));
        assert!(matches!(
            decode(b"this is plainly not an image"),
            Err(DecodeError::Unsupported)
        ));
    }
    #[test]
    fn truncated_png_is_corrupt() {
        let mut bytes = png_bytes();
        bytes.truncate(20);
        assert!(matches!(decode(&bytes), Err(DecodeError::Corrupt(_))));
    }
    #[test]
    fn png_keeps_alpha() {
        let bitmap = decode(&png_bytes()).unwrap();
        assert_eq!(bitmap.dimensions(), [2, 2]);
        assert_eq!(bitmap.pixel(0, 0), Some([255, 0, 0, 128]));
        assert_eq!(bitmap.pixel(1, 1), Some([0, 0, 255, 255]));
        assert_eq!(bitmap.pixel(2, 0), None);
        assert!(bitmap.has_transparency());
    }
    #[test]
    fn jpeg_decodes_opaque() {
        let bitmap = decode(&jpeg_bytes()).unwrap();
        assert_eq!(bitmap.dimensions(), [8, 8]);
        assert_eq!(bitmap.pixels().len(), 64);
        assert!(!bitmap.has_transparency());
    }
    #[test]
    fn from_image() {
        let bitmap = Bitmap::from(image::RgbaImage::new(3, 1));
        assert_eq!(bitmap.as_raw().len(), 12);
    }
}
