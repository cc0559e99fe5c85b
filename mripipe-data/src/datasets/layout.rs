// mripipe-data/src/datasets/layout.rs

use std::path::{Path, PathBuf};

/// Names of the files and directories that make up a data directory.
///
/// ```text
/// <data_dir>/
///   link.csv                        patient_id,original_id
///   dicoms/<patient_id>/<n>.png
///   contourfiles/<original_id>/i-contours/IM-0001-<nnnn>-icontour-manual.txt
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub manifest_file: String,
    /// Manifest column holding the subject key (image subdirectory name).
    pub subject_column: String,
    /// Manifest column holding the annotation-set key (annotation subdirectory name).
    pub annotation_set_column: String,
    pub image_dir: String,
    pub annotation_dir: String,
    /// Fixed subdirectory inside each annotation set that holds the contour files.
    pub annotation_subdir: String,
    pub annotation_prefix: String,
    pub annotation_suffix: String,
    /// Accepted image-record extensions, compared case-insensitively, without the dot.
    pub record_extensions: Vec<String>,
}

impl Default for DataLayout {
    fn default() -> Self {
        DataLayout {
            manifest_file: "link.csv".to_string(),
            subject_column: "patient_id".to_string(),
            annotation_set_column: "original_id".to_string(),
            image_dir: "dicoms".to_string(),
            annotation_dir: "contourfiles".to_string(),
            annotation_subdir: "i-contours".to_string(),
            annotation_prefix: "IM-0001-".to_string(),
            annotation_suffix: "-icontour-manual.txt".to_string(),
            record_extensions: vec!["png".to_string()],
        }
    }
}

impl DataLayout {
    pub fn manifest_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.manifest_file)
    }

    pub fn image_root(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.image_dir)
    }

    pub fn annotation_root(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.annotation_dir)
    }

    /// Contour file name for a sequence index, zero-padded to four digits.
    pub fn annotation_file_name(&self, sequence_index: u32) -> String {
        format!(
            "{}{:04}{}",
            self.annotation_prefix, sequence_index, self.annotation_suffix
        )
    }

    /// Expected contour file for `sequence_index` within an annotation set.
    pub fn annotation_path(
        &self,
        annotation_root: &Path,
        annotation_set_id: &str,
        sequence_index: u32,
    ) -> PathBuf {
        annotation_root
            .join(annotation_set_id)
            .join(&self.annotation_subdir)
            .join(self.annotation_file_name(sequence_index))
    }

    /// Whether `path` has one of the accepted record extensions.
    pub fn accepts_record(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .record_extensions
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}
