//! Core of a layer-based mask editor: a stack of paintable layers, per-layer stroke undo,
//! a document history of structural edits, and canvas resizing that keeps stroke geometry in
//! step with the canvas. Drawing to the screen is left to the embedding application.

pub mod blend;
pub mod canvas;
pub mod color;
pub mod commands;
pub mod config;
pub mod id;
pub mod io;
pub mod notify;
pub mod queue;
pub mod state;
pub mod stroke;
pub mod util;

pub use id::EditorID;
