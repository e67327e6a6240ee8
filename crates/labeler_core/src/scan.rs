use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LabelError, Result};

/// One image in the session's file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// File name; the key of the label table.
    pub name: String,
}

/// List the regular files directly inside `dir`.
///
/// Order is whatever the directory listing yields; it is captured once and
/// not sorted. `extensions` filters case-insensitively, empty accepts all.
pub fn list_images(dir: impl AsRef<Path>, extensions: &[String]) -> Result<Vec<ImageFile>> {
    let root = dir.as_ref();
    if !root.exists() {
        return Err(LabelError::io(
            root,
            io::Error::new(io::ErrorKind::NotFound, "path does not exist"),
        ));
    }
    if !root.is_dir() {
        return Err(LabelError::io(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "path is not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("walkdir error: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !has_accepted_extension(path, extensions) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("skipping non UTF-8 file name: {}", path.display());
            continue;
        };
        files.push(ImageFile {
            path: path.to_path_buf(),
            name: name.to_string(),
        });
    }

    tracing::debug!("found {} files in {}", files.len(), root.display());
    Ok(files)
}

fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn sorted_names(files: Vec<ImageFile>) -> Vec<String> {
        let mut names: Vec<String> = files.into_iter().map(|f| f.name).collect();
        names.sort();
        names
    }

    #[test]
    fn empty_directory_lists_nothing() -> Result<()> {
        let dir = tempdir()?;
        assert!(list_images(dir.path(), &[])?.is_empty());
        Ok(())
    }

    #[test]
    fn lists_every_regular_file_but_not_subdirectories() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.JPG"))?;
        File::create(dir.path().join("notes.txt"))?;
        let nested = dir.path().join("nested");
        fs::create_dir(&nested)?;
        File::create(nested.join("d.jpg"))?;

        let files = list_images(dir.path(), &[])?;
        assert_eq!(sorted_names(files), vec!["a.JPG", "notes.txt"]);
        Ok(())
    }

    #[test]
    fn extension_filter_ignores_case_and_leading_dot() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.JPG"))?;
        File::create(dir.path().join("b.png"))?;
        File::create(dir.path().join("c.txt"))?;
        File::create(dir.path().join("README"))?;

        let exts = vec!["jpg".to_string(), ".PNG".to_string()];
        let files = list_images(dir.path(), &exts)?;
        assert_eq!(sorted_names(files), vec!["a.JPG", "b.png"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_io_error() -> Result<()> {
        let dir = tempdir()?;
        let err = list_images(dir.path().join("nope"), &[]).unwrap_err();
        assert!(matches!(err, LabelError::Io { .. }));
        Ok(())
    }

    #[test]
    fn file_instead_of_directory_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("a.jpg");
        File::create(&file)?;
        assert!(list_images(&file, &[]).is_err());
        Ok(())
    }
}
