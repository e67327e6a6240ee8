//! Command line flags layered over an optional TOML config file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use labeler_core::SessionConfig;

pub const DEFAULT_CONFIG_FILE: &str = "labeler.toml";

#[derive(Debug, Parser)]
#[command(name = "labeler", version = env!("LABELER_VERSION"))]
#[command(about = "Page through a folder of images and tag each with labels")]
pub struct Args {
    /// Folder with images; a folder picker opens when omitted.
    pub image_dir: Option<PathBuf>,

    /// Class name, repeat for more. Order sets the digit shortcut.
    #[arg(short = 'c', long = "class", value_name = "NAME")]
    pub classes: Vec<String>,

    /// Where labels are written [default: ./labels.csv].
    #[arg(short, long, value_name = "CSV")]
    pub labels: Option<PathBuf>,

    #[arg(long)]
    pub multiclass: bool,

    /// Stay on the image after picking a label in single-class mode.
    #[arg(long)]
    pub no_autosubmit: bool,

    /// Save every N steps forward, 0 turns autosave off.
    #[arg(long, value_name = "N")]
    pub autosave: Option<usize>,

    /// Continue from an existing label file instead of refusing to start.
    #[arg(long)]
    pub resume: bool,

    /// Only list files with this extension, repeat for more.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// TOML file with session settings [default: ./labeler.toml if present].
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Settings after merging file and flags.
#[derive(Debug)]
pub struct Resolved {
    pub config: SessionConfig,
    /// False when neither the flags nor a config file named a folder.
    pub has_image_dir: bool,
}

impl Args {
    pub fn resolve(self) -> anyhow::Result<Resolved> {
        let file = match &self.config {
            Some(path) => Some(path.clone()),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Some(DEFAULT_CONFIG_FILE.into()),
            None => None,
        };
        let (config, from_file) = match file {
            Some(path) => {
                let cfg = SessionConfig::from_toml_file(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                tracing::info!("loaded settings from {}", path.display());
                (cfg, true)
            }
            None => (SessionConfig::default(), false),
        };
        Ok(self.apply(config, from_file))
    }

    fn apply(self, mut config: SessionConfig, from_file: bool) -> Resolved {
        let has_image_dir = from_file || self.image_dir.is_some();
        if let Some(dir) = self.image_dir {
            config.image_dir = dir;
        }
        if !self.classes.is_empty() {
            config.classes = self.classes;
        }
        if let Some(labels) = self.labels {
            config.labels_path = labels;
        }
        if self.multiclass {
            config.multiclass = true;
        }
        if self.no_autosubmit {
            config.autosubmit = false;
        }
        if let Some(every) = self.autosave {
            config.autosave_interval = every;
        }
        if self.resume {
            config.resume = true;
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions;
        }
        Resolved {
            config,
            has_image_dir,
        }
    }
}
