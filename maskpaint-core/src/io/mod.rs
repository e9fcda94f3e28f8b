//! # IO
//!
//! The editor core owns no file format. The only thing it reads from the outside world are
//! encoded images, which become layer base bitmaps.

pub mod bitmap;

pub use bitmap::{decode, Bitmap, DecodeError};
