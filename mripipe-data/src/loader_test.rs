// mripipe-data/src/loader_test.rs

use super::*;
use crate::datasets::{DataLayout, DatasetIndex};
use crate::test_utils::{build_data_dir, SubjectSpec};
use mripipe_core::{BoundaryPolicy, DecodedImage, Grid};
use std::path::Path;

fn single_record_index() -> (tempfile::TempDir, DatasetIndex) {
    let dir = build_data_dir(&[SubjectSpec {
        subject_id: "SCD1",
        annotation_set_id: "SC-1",
        images: &[48],
        contours: &[48],
    }]);
    let index = DatasetIndex::from_data_dir(dir.path(), &DataLayout::default()).unwrap();
    assert_eq!(index.entries().len(), 1);
    (dir, index)
}

/// Decoder that always reports an empty image.
struct EmptyDecoder;

impl ImageDecoder for EmptyDecoder {
    fn decode(&self, _path: &Path) -> Result<DecodedImage, PipelineError> {
        Ok(DecodedImage {
            pixels: Grid::filled(0, 0, 0.0),
            sequence_index: None,
        })
    }
}

#[test]
fn test_load_pairs_pixels_with_mask() {
    let (_dir, index) = single_record_index();
    let sample = SampleLoader::default().load(&index.entries()[0]).unwrap();
    assert_eq!(sample.shape(), (12, 16));
    assert_eq!(sample.mask().shape(), sample.pixels().shape());
    assert_eq!(sample.mask().count_true(), 15);
}

#[test]
fn test_load_with_include_boundary() {
    let (_dir, index) = single_record_index();
    let loader = SampleLoader::new(
        RasterImageDecoder::new(),
        ScanlineRasterizer::new(BoundaryPolicy::Include),
    );
    let sample = loader.load(&index.entries()[0]).unwrap();
    assert_eq!(sample.mask().count_true(), 24);
}

#[test]
fn test_load_rejects_zero_sized_image() {
    let (_dir, index) = single_record_index();
    let loader = SampleLoader::new(EmptyDecoder, ScanlineRasterizer::default());
    assert!(matches!(
        loader.load(&index.entries()[0]),
        Err(PipelineError::DimensionMismatch { width: 0, height: 0, .. })
    ));
}

#[test]
fn test_load_reports_corrupt_image() {
    let (_dir, index) = single_record_index();
    let entry = &index.entries()[0];
    std::fs::write(entry.image_path(), b"garbage").unwrap();
    assert!(matches!(
        SampleLoader::default().load(entry),
        Err(PipelineError::Decode { .. })
    ));
}

#[test]
fn test_load_reports_malformed_contour() {
    let (_dir, index) = single_record_index();
    let entry = &index.entries()[0];
    std::fs::write(entry.annotation_path(), "1.0 2.0\n3.0\n").unwrap();
    assert!(matches!(
        SampleLoader::default().load(entry),
        Err(PipelineError::AnnotationParse { line: 2, .. })
    ));
}

#[test]
fn test_load_writes_diagnostics() {
    let (_dir, index) = single_record_index();
    let idir = tempfile::tempdir().unwrap();
    let loader =
        SampleLoader::default().with_diagnostics(DiagnosticsWriter::new(idir.path()).unwrap());

    loader.load(&index.entries()[0]).unwrap();

    let mut names: Vec<String> = std::fs::read_dir(idir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "SCD1-SC-1-0048-image.png".to_string(),
            "SCD1-SC-1-0048-image_with_contour.png".to_string()
        ]
    );
}

#[test]
fn test_failed_load_writes_no_diagnostics() {
    let (_dir, index) = single_record_index();
    let entry = &index.entries()[0];
    std::fs::write(entry.annotation_path(), "x y\n").unwrap();
    let idir = tempfile::tempdir().unwrap();
    let loader =
        SampleLoader::default().with_diagnostics(DiagnosticsWriter::new(idir.path()).unwrap());
    assert!(loader.load(entry).is_err());
    assert_eq!(std::fs::read_dir(idir.path()).unwrap().count(), 0);
}
