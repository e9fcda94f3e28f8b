//! # State
//!
//! The editable document: a canvas size and the stack of layers painted on it.

pub mod document;
pub mod layer;
pub mod layer_manager;
pub mod transform;

pub use document::{Document, DocumentID};
pub use layer::{BaseImage, Dirty, Layer, LayerID};
pub use layer_manager::LayerManager;
