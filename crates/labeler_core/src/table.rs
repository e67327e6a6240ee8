use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LabelError, Result};

pub const FILE_COLUMN: &str = "file";
pub const LABELS_COLUMN: &str = "labels";

#[derive(Debug, Deserialize)]
struct LabelRow {
    file: String,
    #[serde(default)]
    labels: String,
}

/// Persisted mapping from file name to its space-delimited labels.
///
/// One row per file; rows keep the order in which files were first labelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    rows: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a `file,labels` CSV. A missing file is an empty table; a file
    /// listed twice keeps its last row. A row with a blank labels field
    /// counts as no row, the same as a file whose last label was cleared.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = match csv::Reader::from_path(path) {
            Ok(rdr) => rdr,
            Err(e) if is_not_found(&e) => {
                tracing::debug!("no label table at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(LabelError::csv(path, e)),
        };

        let mut table = Self::new();
        for row in rdr.deserialize::<LabelRow>() {
            let row = row.map_err(|e| LabelError::csv(path, e))?;
            if row.labels.trim().is_empty() {
                table.remove(&row.file);
            } else {
                table.set(&row.file, &row.labels);
            }
        }
        tracing::info!("loaded {} label rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Rewrite `path` with the whole table, header included.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut wtr = csv::Writer::from_path(path).map_err(|e| LabelError::csv(path, e))?;
        wtr.write_record([FILE_COLUMN, LABELS_COLUMN])
            .map_err(|e| LabelError::csv(path, e))?;
        for (file, labels) in &self.rows {
            wtr.write_record([file.as_str(), labels.as_str()])
                .map_err(|e| LabelError::csv(path, e))?;
        }
        wtr.flush().map_err(|e| LabelError::io(path, e))?;
        Ok(())
    }

    pub fn get(&self, file: &str) -> Option<&str> {
        self.index.get(file).map(|&i| self.rows[i].1.as_str())
    }

    pub fn set(&mut self, file: &str, labels: &str) {
        match self.index.get(file) {
            Some(&i) => labels.clone_into(&mut self.rows[i].1),
            None => {
                self.index.insert(file.to_string(), self.rows.len());
                self.rows.push((file.to_string(), labels.to_string()));
            }
        }
    }

    /// Drop the row for `file`, returning its labels if there was one.
    pub fn remove(&mut self, file: &str) -> Option<String> {
        let i = self.index.remove(file)?;
        let (_, labels) = self.rows.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(labels)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().map(|(f, l)| (f.as_str(), l.as_str()))
    }
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::NotFound)
}
