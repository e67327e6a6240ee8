//! Session logic for paging through a directory of images and tagging each
//! one with labels from a fixed class list, persisted as a `file,labels` CSV.

pub mod command;
pub mod config;
pub mod error;
pub mod labels;
pub mod scan;
pub mod session;
pub mod table;

pub use command::{Command, LabelRef, command_from_keystroke};
pub use config::{DEFAULT_LABELS_PATH, SessionConfig};
pub use error::{LabelError, Result};
pub use labels::LabelSet;
pub use scan::{ImageFile, list_images};
pub use session::{Session, SessionOptions};
pub use table::LabelTable;
