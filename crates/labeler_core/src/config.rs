use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LabelError, Result};

pub const DEFAULT_LABELS_PATH: &str = "./labels.csv";

/// Everything needed to open a [`Session`](crate::Session).
///
/// Missing keys in a TOML file fall back to [`SessionConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory holding the images to label.
    pub image_dir: PathBuf,
    /// Allowed labels; position `i` is bound to digit `i`.
    pub classes: Vec<String>,
    pub labels_path: PathBuf,
    /// Allow any subset of labels per image instead of at most one.
    pub multiclass: bool,
    /// In single-class mode, advance to the next image after a toggle.
    pub autosubmit: bool,
    /// Save every `n` navigation steps; 0 disables autosave.
    pub autosave_interval: usize,
    /// Load an existing label file instead of refusing to start.
    pub resume: bool,
    /// Case-insensitive extension filter; empty accepts every file.
    pub extensions: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("."),
            classes: Vec::new(),
            labels_path: PathBuf::from(DEFAULT_LABELS_PATH),
            multiclass: false,
            autosubmit: true,
            autosave_interval: 1,
            resume: false,
            extensions: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn new(
        image_dir: impl Into<PathBuf>,
        classes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            classes: classes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(raw: &str, origin: impl Into<PathBuf>) -> Result<Self> {
        toml::from_str(raw).map_err(|source| LabelError::Config {
            path: origin.into(),
            source,
        })
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| LabelError::io(path, e))?;
        Self::from_toml_str(&raw, path)
    }
}
