use super::HistoryManager;
use crate::canvas::{CanvasSize, ResizeMode};
use crate::commands::{Action, ActionError, AddLayerAction, ResizeCanvasAction};
use crate::config::EditorConfig;
use crate::io::DecodeError;
use crate::state::{Document, LayerID};

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// A document together with its history, set up from the editor settings.
#[derive(Debug)]
pub struct Session {
    pub document: Document,
    pub history: HistoryManager,
    config: EditorConfig,
    /// Layers named so far, for numbering.
    named_layers: u64,
}
impl Session {
    #[must_use]
    pub fn from_config(config: EditorConfig) -> Self {
        Self {
            document: Document::from_config(&config),
            history: HistoryManager::with_limit(config.history_limit()),
            config,
            named_layers: 0,
        }
    }
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
    /// Execute and record an action against this session's document.
    pub fn apply(&mut self, action: impl Action + 'static) -> Result<(), ActionError> {
        self.history.execute(&mut self.document, action)
    }
    pub fn undo(&mut self) -> Result<bool, ActionError> {
        self.history.undo(&mut self.document)
    }
    pub fn redo(&mut self) -> Result<bool, ActionError> {
        self.history.redo(&mut self.document)
    }
    /// Add an empty, numbered layer on top, as an undoable action.
    pub fn add_layer(&mut self) -> Result<LayerID, ActionError> {
        let base = self.config.default_layer_name.clone();
        let name = self.next_name(&base);
        self.add(AddLayerAction::empty(name))
    }
    /// Decode an image into a new numbered layer on top, as an undoable action.
    ///
    /// Nothing is recorded or changed if decoding fails.
    pub fn import_image(&mut self, bytes: &[u8]) -> Result<LayerID, SessionError> {
        let bitmap = crate::io::decode(bytes)?;
        let base = self.config.imported_layer_name.clone();
        let name = self.next_name(&base);
        Ok(self.add(AddLayerAction::from_bitmap(bitmap, name))?)
    }
    pub fn resize_canvas(&mut self, size: CanvasSize, mode: ResizeMode) -> Result<(), ActionError> {
        self.apply(ResizeCanvasAction::new(size, mode))
    }
    fn add(&mut self, action: AddLayerAction) -> Result<LayerID, ActionError> {
        let id = action.layer_id();
        self.apply(action)?;
        Ok(id)
    }
    fn next_name(&mut self, base: &str) -> String {
        self.named_layers += 1;
        format!("{base} {}", self.named_layers)
    }
}
impl Default for Session {
    fn default() -> Self {
        Self::from_config(EditorConfig::default())
    }
}

#[cfg(test)]
mod test {
    use super::{Session, SessionError};
    use crate::canvas::{CanvasSize, ResizeMode};
    use crate::config::EditorConfig;
    use crate::io::DecodeError;

    #[test]
    fn configured_session() -> anyhow::Result<()> {
        let config = EditorConfig::from_toml_str(
            "canvas_width = 300\ncanvas_height = 200\nhistory_limit = 1\ndefault_layer_name = \"Mask\"\n",
        )?;
        let mut session = Session::from_config(config);
        assert_eq!(session.document.canvas_size, CanvasSize::new(300, 200)?);

        let first = session.add_layer()?;
        let second = session.add_layer()?;
        assert_eq!(session.document.layers.get(first).unwrap().name(), "Mask 1");
        assert_eq!(session.document.layers.get(second).unwrap().name(), "Mask 2");
        assert_eq!(session.document.layers.active_layer_id(), Some(second));
        assert_eq!(session.history.undo_description().as_deref(), Some("add layer \"Mask 2\""));
        // Limit of one: only the second add is undoable.
        assert!(session.undo()?);
        assert!(!session.undo()?);
        assert_eq!(session.document.layers.len(), 1);
        assert!(session.redo()?);
        assert_eq!(session.document.layers.active_layer_id(), Some(second));
        Ok(())
    }
    #[test]
    fn import_failure_records_nothing() {
        let mut session = Session::default();
        assert!(matches!(
            session.import_image(&[1, 2, 3, 4]),
            Err(SessionError::Decode(DecodeError::Unsupported))
        ));
        assert!(session.document.layers.is_empty());
        assert!(session.history.is_empty());
    }
    #[test]
    fn import_and_resize() -> anyhow::Result<()> {
        let mut session = Session::default();
        let id = session.import_image(&crate::io::bitmap::test::png_bytes())?;
        assert_eq!(session.document.layers.get(id).unwrap().name(), "Imported 1");
        session.resize_canvas(CanvasSize::new(2048, 1024)?, ResizeMode::Stretch)?;
        let image = session.document.layers.get(id).unwrap().base_image().unwrap();
        assert_eq!(image.scale(), [2.0, 1.0]);
        session.undo()?;
        let image = session.document.layers.get(id).unwrap().base_image().unwrap();
        assert_eq!(image.scale(), [1.0, 1.0]);
        Ok(())
    }
}
