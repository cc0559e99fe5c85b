// mripipe-data/src/datasets/dataset_index.rs

use super::layout::DataLayout;
use super::traits::Dataset;
use log::{debug, info, warn};
use mripipe_core::decoder::sequence_index_from_file_name;
use mripipe_core::{PipelineError, SampleRef};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One manifest row: a subject linked to an annotation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub subject_id: String,
    pub annotation_set_id: String,
}

/// The ordered collection of image records that have a matching annotation file.
///
/// Built once, read-only afterwards. Entries follow manifest row order, then the
/// file-name order of each subject directory. An empty index is a valid result;
/// callers decide whether that is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetIndex {
    entries: Vec<SampleRef>,
}

impl DatasetIndex {
    /// Wraps already-validated entries.
    pub fn from_entries(entries: Vec<SampleRef>) -> Self {
        Self { entries }
    }

    /// Builds the index using the default [`DataLayout`] naming.
    ///
    /// # Errors
    ///
    /// See [`DatasetIndex::build_with_layout`].
    pub fn build(
        manifest_path: &Path,
        image_root: &Path,
        annotation_root: &Path,
    ) -> Result<Self, PipelineError> {
        Self::build_with_layout(manifest_path, image_root, annotation_root, &DataLayout::default())
    }

    /// Builds the index for a data directory laid out as described by `layout`.
    pub fn from_data_dir(data_dir: &Path, layout: &DataLayout) -> Result<Self, PipelineError> {
        Self::build_with_layout(
            &layout.manifest_path(data_dir),
            &layout.image_root(data_dir),
            &layout.annotation_root(data_dir),
            layout,
        )
    }

    /// Scans the manifest and both directory trees.
    ///
    /// For every manifest row, each accepted record under `image_root/<subject>` whose
    /// sequence index has a contour file under `annotation_root/<set>` becomes one entry.
    /// Records with an unparsable file name are logged and skipped, records without a
    /// contour file are skipped at debug level.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Manifest` if the manifest cannot be opened or lacks a required column.
    /// - `PipelineError::MissingDirectory` if a subject directory does not exist.
    /// - `PipelineError::Io` if a subject directory cannot be listed for another reason.
    pub fn build_with_layout(
        manifest_path: &Path,
        image_root: &Path,
        annotation_root: &Path,
        layout: &DataLayout,
    ) -> Result<Self, PipelineError> {
        let rows = read_manifest(manifest_path, layout)?;
        let mut entries = Vec::new();
        let mut unmatched = 0usize;
        let mut unparsable = 0usize;

        for row in &rows {
            let subject_dir = image_root.join(&row.subject_id);
            debug!(
                "Processing image records in '{}' linked to annotation set '{}'",
                subject_dir.display(),
                annotation_root.join(&row.annotation_set_id).display()
            );

            for record in list_records(&subject_dir)? {
                if !layout.accepts_record(&record) {
                    debug!("Unexpected file '{}' found in image directory.", record.display());
                    continue;
                }
                let sequence_index = match sequence_index_from_file_name(&record) {
                    Ok(n) => n,
                    Err(e) => {
                        warn!("Skipping record: {}", e);
                        unparsable += 1;
                        continue;
                    }
                };

                let annotation_path =
                    layout.annotation_path(annotation_root, &row.annotation_set_id, sequence_index);
                if annotation_path.is_file() {
                    entries.push(SampleRef::new(
                        record,
                        annotation_path,
                        row.subject_id.clone(),
                        row.annotation_set_id.clone(),
                        sequence_index,
                    ));
                } else {
                    debug!("No annotation file for image record '{}'", record.display());
                    unmatched += 1;
                }
            }
        }

        info!(
            "Indexed {} samples from {} manifest rows ({} without annotation, {} unparsable)",
            entries.len(),
            rows.len(),
            unmatched,
            unparsable
        );
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SampleRef] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampleRef> {
        self.entries.iter()
    }
}

impl Dataset for DatasetIndex {
    type Item = SampleRef;

    /// Clones the entry at `index`.
    fn get(&self, index: usize) -> Result<Self::Item, PipelineError> {
        self.entries
            .get(index)
            .cloned()
            .ok_or(PipelineError::IndexOutOfBounds {
                index,
                len: self.entries.len(),
            })
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a> IntoIterator for &'a DatasetIndex {
    type Item = &'a SampleRef;
    type IntoIter = std::slice::Iter<'a, SampleRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Reads `(subject, annotation set)` rows from the manifest.
///
/// # Errors
///
/// Returns `PipelineError::Manifest` if the file cannot be opened, a row is malformed,
/// a required column is missing or a key is empty.
pub fn read_manifest(path: &Path, layout: &DataLayout) -> Result<Vec<ManifestRow>, PipelineError> {
    let manifest_err = |message: String| PipelineError::Manifest {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| manifest_err(e.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|e| manifest_err(e.to_string()))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| manifest_err(format!("missing required column '{}'", name)))
    };
    let subject_col = column(&layout.subject_column)?;
    let set_col = column(&layout.annotation_set_column)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| manifest_err(e.to_string()))?;
        let field = |col: usize| -> Result<String, PipelineError> {
            match record.get(col) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(manifest_err(format!("row {} has an empty key", i + 2))),
            }
        };
        rows.push(ManifestRow {
            subject_id: field(subject_col)?,
            annotation_set_id: field(set_col)?,
        });
    }
    Ok(rows)
}

/// Regular files directly inside `dir`, sorted by file name.
fn list_records(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let read_dir = fs::read_dir(dir).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PipelineError::MissingDirectory {
            path: dir.to_path_buf(),
        },
        _ if !dir.is_dir() => PipelineError::MissingDirectory {
            path: dir.to_path_buf(),
        },
        _ => PipelineError::io(dir, e),
    })?;

    let mut records = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            records.push(path);
        }
    }
    records.sort();
    Ok(records)
}

#[cfg(test)]
#[path = "dataset_index_test.rs"]
mod tests;
