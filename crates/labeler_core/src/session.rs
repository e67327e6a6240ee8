use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::command::{Command, LabelRef};
use crate::config::SessionConfig;
use crate::error::{LabelError, Result};
use crate::labels::LabelSet;
use crate::scan::{self, ImageFile};
use crate::table::LabelTable;

/// Behaviour switches fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub multiclass: bool,
    pub autosubmit: bool,
    pub autosave_interval: usize,
}

/// One labeling run over a fixed list of files.
///
/// The presentation layer drives it through [`Session::dispatch`] and pulls
/// state back out after each call; [`Session::revision`] changes whenever
/// there is something new to draw.
#[derive(Debug)]
pub struct Session {
    files: Vec<ImageFile>,
    index: usize,
    classes: Vec<String>,
    labels_path: PathBuf,
    options: SessionOptions,
    table: LabelTable,
    current: LabelSet,
    image: Arc<[u8]>,
    revision: u64,
}

impl Session {
    /// Start a session and show the first file.
    ///
    /// Fails with [`LabelError::AlreadyExists`] if the label file is on disk
    /// and `resume` is off; the file is not touched in that case.
    pub fn open(config: SessionConfig) -> Result<Self> {
        let SessionConfig {
            image_dir,
            classes,
            labels_path,
            multiclass,
            autosubmit,
            autosave_interval,
            resume,
            extensions,
        } = config;

        check_classes(&classes)?;
        if labels_path.exists() && !resume {
            return Err(LabelError::AlreadyExists(labels_path));
        }
        let table = LabelTable::load(&labels_path)?;

        let mut files = scan::list_images(&image_dir, &extensions)?;
        if let Ok(own) = fs::canonicalize(&labels_path) {
            files.retain(|f| !fs::canonicalize(&f.path).is_ok_and(|p| p == own));
        }
        if files.is_empty() {
            return Err(LabelError::NoImages(image_dir));
        }

        let mut session = Self {
            files,
            index: 0,
            classes,
            labels_path,
            options: SessionOptions {
                multiclass,
                autosubmit,
                autosave_interval,
            },
            table,
            current: LabelSet::new(),
            image: Arc::from(Vec::new()),
            revision: 0,
        };
        session.show_image(0)?;
        tracing::info!(
            "session opened: {} files in {}, {} classes, labels at {}",
            session.files.len(),
            image_dir.display(),
            session.classes.len(),
            session.labels_path.display()
        );
        Ok(session)
    }

    /// Run one user intent to completion.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::Toggle(label) => self.toggle_label(label),
            Command::Save => self.save(),
        }
    }

    /// Load file `target` (clamped to the last file) and its labels.
    pub fn show_image(&mut self, target: usize) -> Result<()> {
        let index = target.min(self.files.len() - 1);
        let file = &self.files[index];
        let bytes = fs::read(&file.path).map_err(|e| LabelError::io(&file.path, e))?;
        self.current = self
            .table
            .get(&file.name)
            .map(LabelSet::parse)
            .unwrap_or_default();
        self.image = Arc::from(bytes);
        self.index = index;
        tracing::debug!("showing {} ({}/{})", file.name, index + 1, self.files.len());
        self.refresh();
        Ok(())
    }

    /// Autosave if due, then advance one file; stays put on the last file.
    pub fn next(&mut self) -> Result<()> {
        self.autosave()?;
        let target = if self.index + 1 < self.files.len() {
            self.index + 1
        } else {
            self.index
        };
        self.show_image(target)
    }

    /// Step back one file; stays put on the first file.
    pub fn previous(&mut self) -> Result<()> {
        self.show_image(self.index.saturating_sub(1))
    }

    /// Flip one label on the current file.
    ///
    /// In single-class mode the result holds only the toggled label, and with
    /// autosubmit the session moves on to the next file. A file left with no
    /// active label loses its table row.
    pub fn toggle_label(&mut self, label: impl Into<LabelRef>) -> Result<()> {
        let label = self.resolve(label.into())?;
        let active = !self.current.get(&label);
        if !self.options.multiclass {
            self.current = LabelSet::new();
        }
        self.current.set(&label, active);
        self.write_back();
        tracing::debug!(
            "{} -> {:?}",
            self.files[self.index].name,
            self.current.to_field()
        );

        if !self.options.multiclass && self.options.autosubmit {
            self.next()
        } else {
            self.refresh();
            Ok(())
        }
    }

    /// Write the current labels into the table and rewrite the label file.
    pub fn save(&mut self) -> Result<()> {
        self.write_back();
        self.table.save(&self.labels_path)?;
        tracing::info!(
            "saved {} label rows to {}",
            self.table.len(),
            self.labels_path.display()
        );
        Ok(())
    }

    /// Save when the interval divides the current index. Returns whether it did.
    pub fn autosave(&mut self) -> Result<bool> {
        let every = self.options.autosave_interval;
        if every > 0 && self.index % every == 0 {
            self.save()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn current_file(&self) -> &ImageFile {
        &self.files[self.index]
    }

    pub fn current_labels(&self) -> &LabelSet {
        &self.current
    }

    /// Raw bytes of the current file; the format is left to the viewer.
    pub fn image_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.image)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn is_active(&self, label: &str) -> bool {
        self.current.get(label)
    }

    /// `(digit, class, active)` for every class, in button order.
    pub fn class_states(&self) -> impl Iterator<Item = (usize, &str, bool)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.as_str(), self.current.get(c)))
    }

    pub fn table(&self) -> &LabelTable {
        &self.table
    }

    pub fn labels_path(&self) -> &Path {
        &self.labels_path
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn refresh(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn resolve(&self, label: LabelRef) -> Result<String> {
        match label {
            LabelRef::Index(index) => {
                self.classes
                    .get(index)
                    .cloned()
                    .ok_or(LabelError::UnknownClass {
                        index,
                        count: self.classes.len(),
                    })
            }
            LabelRef::Name(name) if self.classes.contains(&name) => Ok(name),
            LabelRef::Name(name) => Err(LabelError::UnknownLabel(name)),
        }
    }

    fn write_back(&mut self) {
        let name = &self.files[self.index].name;
        if self.current.has_active() {
            self.table.set(name, &self.current.to_field());
        } else if self.table.remove(name).is_some() {
            tracing::debug!("cleared labels for {}", name);
        }
    }
}

/// Class names are stored space-delimited, so each must be a single
/// non-empty token, and a digit may only address one of them.
fn check_classes(classes: &[String]) -> Result<()> {
    for (i, class) in classes.iter().enumerate() {
        let repeated = classes[..i].contains(class);
        if class.is_empty() || class.chars().any(char::is_whitespace) || repeated {
            return Err(LabelError::InvalidClass(class.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rstest::rstest;
    use std::fs::File;
    use tempfile::{TempDir, tempdir};

    fn fixture(files: &[&str]) -> Result<(TempDir, SessionConfig)> {
        let dir = tempdir()?;
        let images = dir.path().join("images");
        fs::create_dir(&images)?;
        for name in files {
            fs::write(images.join(name), name.as_bytes())?;
        }
        let mut cfg = SessionConfig::new(&images, ["cat", "dog"]);
        cfg.labels_path = dir.path().join("labels.csv");
        Ok((dir, cfg))
    }

    #[test]
    fn open_shows_first_file() -> Result<()> {
        let (_dir, cfg) = fixture(&["a.jpg", "b.jpg"])?;
        let session = Session::open(cfg)?;
        assert_eq!(session.index(), 0);
        assert_eq!(&*session.image_bytes(), session.files()[0].name.as_bytes());
        assert!(session.current_labels().is_empty());
        assert_eq!(session.revision(), 1);
        Ok(())
    }

    #[test]
    fn empty_directory_is_rejected() -> Result<()> {
        let (_dir, cfg) = fixture(&[])?;
        assert!(matches!(Session::open(cfg), Err(LabelError::NoImages(_))));
        Ok(())
    }

    #[rstest]
    #[case::empty(&["cat", ""], "")]
    #[case::inner_space(&["big cat", "dog"], "big cat")]
    #[case::tab(&["cat", "dog\t"], "dog\t")]
    #[case::repeated(&["cat", "dog", "cat"], "cat")]
    fn unusable_class_names_are_rejected(
        #[case] classes: &[&str],
        #[case] offender: &str,
    ) -> Result<()> {
        let (_dir, mut cfg) = fixture(&["a.jpg"])?;
        cfg.classes = classes.iter().map(|c| c.to_string()).collect();
        match Session::open(cfg) {
            Err(LabelError::InvalidClass(name)) => assert_eq!(name, offender),
            other => panic!("expected InvalidClass, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn class_check_runs_before_the_folder_is_read() -> Result<()> {
        let (dir, mut cfg) = fixture(&[])?;
        cfg.image_dir = dir.path().join("missing");
        cfg.classes = vec!["big cat".into()];
        assert!(matches!(
            Session::open(cfg),
            Err(LabelError::InvalidClass(_))
        ));
        Ok(())
    }

    #[test]
    fn single_token_classes_survive_save_and_resume() -> Result<()> {
        let (_dir, mut cfg) = fixture(&["a.jpg"])?;
        cfg.classes = vec!["big_cat".into(), "dog".into()];
        cfg.autosubmit = false;
        let mut session = Session::open(cfg.clone())?;
        session.toggle_label(0usize)?;
        session.save()?;

        cfg.resume = true;
        let reloaded = Session::open(cfg)?;
        assert!(reloaded.is_active("big_cat"));
        assert_eq!(reloaded.current_labels().to_field(), "big_cat");
        Ok(())
    }

    #[test]
    fn unknown_class_index_leaves_state_alone() -> Result<()> {
        let (_dir, cfg) = fixture(&["a.jpg"])?;
        let mut session = Session::open(cfg)?;
        let before = session.revision();
        let err = session.toggle_label(5usize).unwrap_err();
        assert!(matches!(err, LabelError::UnknownClass { index: 5, count: 2 }));
        assert!(matches!(
            session.toggle_label("bird"),
            Err(LabelError::UnknownLabel(_))
        ));
        assert_eq!(session.revision(), before);
        assert!(session.table().is_empty());
        Ok(())
    }

    #[test]
    fn labels_file_inside_image_dir_is_not_listed() -> Result<()> {
        let (_dir, mut cfg) = fixture(&["a.jpg"])?;
        cfg.labels_path = cfg.image_dir.join("labels.csv");
        File::create(&cfg.labels_path)?;
        cfg.resume = true;
        let session = Session::open(cfg)?;
        assert_eq!(session.len(), 1);
        assert_eq!(session.current_file().name, "a.jpg");
        Ok(())
    }

    #[test]
    fn blank_resumed_rows_drop_whichever_file_is_shown() -> Result<()> {
        let (_dir, mut cfg) = fixture(&["a.jpg", "b.jpg"])?;
        fs::write(&cfg.labels_path, "file,labels\na.jpg,\nb.jpg,\n")?;
        cfg.resume = true;
        let mut session = Session::open(cfg)?;
        assert!(session.table().is_empty());

        session.save()?;
        let written = fs::read_to_string(session.labels_path())?;
        assert_eq!(written, "file,labels\n");
        Ok(())
    }

    #[test]
    fn show_image_clamps_target() -> Result<()> {
        let (_dir, cfg) = fixture(&["a.jpg", "b.jpg"])?;
        let mut session = Session::open(cfg)?;
        session.show_image(10)?;
        assert_eq!(session.index(), 1);
        Ok(())
    }

    #[test]
    fn class_states_follow_current_labels() -> Result<()> {
        let (_dir, mut cfg) = fixture(&["a.jpg"])?;
        cfg.multiclass = true;
        let mut session = Session::open(cfg)?;
        session.toggle_label(1usize)?;
        let states: Vec<_> = session.class_states().collect();
        assert_eq!(states, vec![(0, "cat", false), (1, "dog", true)]);
        Ok(())
    }
}
