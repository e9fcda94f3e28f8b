use crate::canvas::CanvasSize;
use crate::config::EditorConfig;
use crate::state::layer_manager::LayerManager;

pub type DocumentID = crate::EditorID<Document>;

/// Everything history actions operate on: the canvas bounds and the layers painted in them.
#[derive(Debug)]
pub struct Document {
    id: DocumentID,
    /// Display name of the editing session.
    pub name: String,
    /// Current bounds. Changed through `ResizeCanvasAction` so layers stay in sync.
    pub canvas_size: CanvasSize,
    pub layers: LayerManager,
}
impl Document {
    #[must_use]
    pub fn new(canvas_size: CanvasSize) -> Self {
        let id = DocumentID::default();
        Self {
            id,
            name: format!("Untitled {}", id.id()),
            canvas_size,
            layers: LayerManager::new(),
        }
    }
    /// A new document sized by `config`, falling back to the default size if the configured one is degenerate.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        let size = config.canvas_size().unwrap_or_else(|err| {
            log::warn!("{err}, using the default canvas size");
            EditorConfig::default_canvas_size()
        });
        Self::new(size)
    }
    #[must_use]
    pub fn id(&self) -> DocumentID {
        self.id
    }
}
impl Default for Document {
    fn default() -> Self {
        Self::new(EditorConfig::default_canvas_size())
    }
}
