use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a labeling session.
///
/// A missing label file at load time and a missing row for the shown image
/// are not errors: they read as "empty table" and "no labels yet".
#[derive(Debug, Error)]
pub enum LabelError {
    /// The label file is already on disk and the session was not asked to resume.
    #[error("label file {} exists already", .0.display())]
    AlreadyExists(PathBuf),

    #[error("no image files found in {}", .0.display())]
    NoImages(PathBuf),

    #[error("class index {index} is out of range ({count} classes)")]
    UnknownClass { index: usize, count: usize },

    /// Empty, containing whitespace, or listed twice.
    #[error("class name {0:?} is empty, contains whitespace or is repeated")]
    InvalidClass(String),

    #[error("label {0:?} is not one of the configured classes")]
    UnknownLabel(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("label table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl LabelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LabelError> = std::result::Result<T, E>;
