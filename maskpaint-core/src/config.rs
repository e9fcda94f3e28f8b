//! # Configuration
//!
//! Editor defaults, read from `editor.toml` in the user's preferences directory. Every key is
//! optional. A missing or unreadable file falls back to the defaults with a warning.

use crate::canvas::{CanvasSize, CanvasSizeError};

pub const DOCUMENTATION: &str = r#"# Mask editor settings. All keys are optional.
#
# canvas_width = 1024
# canvas_height = 1024
# Number of structural edits kept for undo. 0 keeps everything.
# history_limit = 100
# default_layer_name = "Layer"
# imported_layer_name = "Imported"

"#;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Maximum depth of the document history. `0` for unbounded.
    pub history_limit: usize,
    /// Base name for new empty layers, numbered as they are created.
    pub default_layer_name: String,
    /// Base name for layers created from imported images.
    pub imported_layer_name: String,
}
impl Default for EditorConfig {
    fn default() -> Self {
        let size = Self::default_canvas_size();
        Self {
            canvas_width: size.width(),
            canvas_height: size.height(),
            history_limit: 100,
            default_layer_name: "Layer".to_owned(),
            imported_layer_name: "Imported".to_owned(),
        }
    }
}
impl EditorConfig {
    pub const FILENAME: &'static str = "editor.toml";

    #[must_use]
    pub fn default_canvas_size() -> CanvasSize {
        CanvasSize::DEFAULT
    }
    /// `$PREFERENCES/maskpaint-core/editor.toml`, if the platform has a preferences directory.
    #[must_use]
    pub fn preferences_path() -> Option<std::path::PathBuf> {
        let mut path = dirs::preference_dir()?;
        path.push(env!("CARGO_PKG_NAME"));
        path.push(Self::FILENAME);
        Some(path)
    }
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
    /// Serialize, prefixed by a commented description of every key.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let body = toml::to_string(self)?;
        Ok(format!("{DOCUMENTATION}{body}"))
    }
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}, using default editor settings ({path:?})");
                Self::default()
            }
        }
    }
    pub fn canvas_size(&self) -> Result<CanvasSize, CanvasSizeError> {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }
    /// `None` for unbounded.
    #[must_use]
    pub fn history_limit(&self) -> Option<std::num::NonZeroUsize> {
        std::num::NonZeroUsize::new(self.history_limit)
    }
}

#[cfg(test)]
mod test {
    use super::{ConfigError, EditorConfig};

    #[test]
    fn empty_is_default() {
        assert_eq!(
            EditorConfig::from_toml_str("").unwrap(),
            EditorConfig::default()
        );
    }
    #[test]
    fn partial_overrides() -> anyhow::Result<()> {
        let config = EditorConfig::from_toml_str("canvas_width = 512\nhistory_limit = 0\n")?;
        assert_eq!(config.canvas_width, 512);
        assert_eq!(config.canvas_height, 1024);
        assert_eq!(config.history_limit(), None);
        assert_eq!(config.canvas_size()?.width(), 512);
        Ok(())
    }
    #[test]
    fn bad_type_is_parse_error() {
        assert!(matches!(
            EditorConfig::from_toml_str("canvas_width = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }
    #[test]
    fn serialized_form_reloads() -> anyhow::Result<()> {
        let config = EditorConfig {
            default_layer_name: "Mask".to_owned(),
            ..EditorConfig::default()
        };
        let text = config.to_toml_string()?;
        assert!(text.starts_with("# Mask editor settings"));
        assert_eq!(EditorConfig::from_toml_str(&text)?, config);
        Ok(())
    }
    #[test]
    fn missing_file_defaults() {
        let path = std::path::Path::new("/definitely/not/here/editor.toml");
        assert_eq!(EditorConfig::load_or_default(path), EditorConfig::default());
    }
}
