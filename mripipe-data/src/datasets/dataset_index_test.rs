// mripipe-data/src/datasets/dataset_index_test.rs

use super::*;
use crate::test_utils::{build_data_dir, init_logger, write_png, SubjectSpec};
use std::collections::HashSet;

#[test]
fn test_build_keeps_only_matched_records() {
    init_logger();
    let dir = build_data_dir(&[
        SubjectSpec {
            subject_id: "SCD0000101",
            annotation_set_id: "SC-HF-I-1",
            images: &[1, 2, 3, 4],
            contours: &[2, 4],
        },
        SubjectSpec {
            subject_id: "SCD0000201",
            annotation_set_id: "SC-HF-I-2",
            images: &[10, 11, 12],
            contours: &[10, 11, 12, 99],
        },
    ]);

    let index = DatasetIndex::from_data_dir(dir.path(), &DataLayout::default()).unwrap();
    assert_eq!(index.len(), 5);

    let seen: HashSet<(String, u32)> = index
        .iter()
        .map(|r| (r.subject_id().to_string(), r.sequence_index()))
        .collect();
    assert!(seen.contains(&("SCD0000101".to_string(), 2)));
    assert!(seen.contains(&("SCD0000101".to_string(), 4)));
    assert!(!seen.contains(&("SCD0000101".to_string(), 1)));
    assert!(seen.contains(&("SCD0000201".to_string(), 12)));

    for entry in index.entries() {
        assert!(entry.image_path().is_file());
        assert!(entry.annotation_path().is_file());
    }
}

#[test]
fn test_build_follows_manifest_row_order() {
    let dir = build_data_dir(&[
        SubjectSpec {
            subject_id: "B",
            annotation_set_id: "set-b",
            images: &[1],
            contours: &[1],
        },
        SubjectSpec {
            subject_id: "A",
            annotation_set_id: "set-a",
            images: &[1],
            contours: &[1],
        },
    ]);
    let index = DatasetIndex::from_data_dir(dir.path(), &DataLayout::default()).unwrap();
    let subjects: Vec<&str> = index.iter().map(|r| r.subject_id()).collect();
    assert_eq!(subjects, vec!["B", "A"]);
}

#[test]
fn test_build_via_explicit_paths() {
    let dir = build_data_dir(&[SubjectSpec {
        subject_id: "S1",
        annotation_set_id: "O1",
        images: &[48],
        contours: &[48],
    }]);
    let layout = DataLayout::default();
    let index = DatasetIndex::build(
        &layout.manifest_path(dir.path()),
        &layout.image_root(dir.path()),
        &layout.annotation_root(dir.path()),
    )
    .unwrap();
    assert_eq!(index.len(), 1);
    let entry = index.get(0).unwrap();
    assert!(entry
        .annotation_path()
        .ends_with("O1/i-contours/IM-0001-0048-icontour-manual.txt"));
}

#[test]
fn test_build_skips_foreign_and_unparsable_files() {
    let dir = build_data_dir(&[SubjectSpec {
        subject_id: "S1",
        annotation_set_id: "O1",
        images: &[3],
        contours: &[3],
    }]);
    let subject_dir = dir.path().join("dicoms").join("S1");
    std::fs::write(subject_dir.join("notes.txt"), "not an image").unwrap();
    write_png(&subject_dir.join("IM-7.png"), 4, 4);
    std::fs::create_dir(subject_dir.join("nested")).unwrap();

    let index = DatasetIndex::from_data_dir(dir.path(), &DataLayout::default()).unwrap();
    assert_eq!(index.len(), 1);
}

#[test]
fn test_build_with_no_matches_is_empty_not_error() {
    let dir = build_data_dir(&[SubjectSpec {
        subject_id: "S1",
        annotation_set_id: "O1",
        images: &[1, 2],
        contours: &[5],
    }]);
    let index = DatasetIndex::from_data_dir(dir.path(), &DataLayout::default()).unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_missing_subject_directory_is_fatal() {
    let dir = build_data_dir(&[SubjectSpec {
        subject_id: "S1",
        annotation_set_id: "O1",
        images: &[1],
        contours: &[1],
    }]);
    let layout = DataLayout::default();
    let manifest = layout.manifest_path(dir.path());
    std::fs::write(&manifest, "patient_id,original_id\nS1,O1\nGHOST,O2\n").unwrap();

    match DatasetIndex::from_data_dir(dir.path(), &layout) {
        Err(PipelineError::MissingDirectory { path }) => assert!(path.ends_with("GHOST")),
        other => panic!("Expected MissingDirectory, got {:?}", other),
    }
}

#[test]
fn test_missing_manifest_is_manifest_error() {
    let dir = tempfile::tempdir().unwrap();
    match DatasetIndex::from_data_dir(dir.path(), &DataLayout::default()) {
        Err(PipelineError::Manifest { .. }) => {}
        other => panic!("Expected Manifest error, got {:?}", other),
    }
}

#[test]
fn test_manifest_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("link.csv");
    std::fs::write(&path, "patient_id,something_else\nS1,O1\n").unwrap();
    match read_manifest(&path, &DataLayout::default()) {
        Err(PipelineError::Manifest { message, .. }) => assert!(message.contains("original_id")),
        other => panic!("Expected Manifest error, got {:?}", other),
    }
}

#[test]
fn test_manifest_tolerates_extra_columns_and_spaces() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("link.csv");
    std::fs::write(&path, "original_id, extra ,patient_id\n O1 ,x, S1\nO2,y,S2\n").unwrap();
    let rows = read_manifest(&path, &DataLayout::default()).unwrap();
    assert_eq!(
        rows,
        vec![
            ManifestRow {
                subject_id: "S1".to_string(),
                annotation_set_id: "O1".to_string()
            },
            ManifestRow {
                subject_id: "S2".to_string(),
                annotation_set_id: "O2".to_string()
            },
        ]
    );
}

#[test]
fn test_manifest_rejects_ragged_rows_and_empty_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("link.csv");
    std::fs::write(&path, "patient_id,original_id\nS1\n").unwrap();
    assert!(matches!(
        read_manifest(&path, &DataLayout::default()),
        Err(PipelineError::Manifest { .. })
    ));

    std::fs::write(&path, "patient_id,original_id\n,O1\n").unwrap();
    assert!(matches!(
        read_manifest(&path, &DataLayout::default()),
        Err(PipelineError::Manifest { .. })
    ));
}

#[test]
fn test_dataset_get_out_of_bounds() {
    let index = DatasetIndex::from_entries(vec![SampleRef::new("1.png", "c.txt", "S", "O", 1)]);
    assert_eq!(index.len(), 1);
    assert!(index.get(0).is_ok());
    match index.get(1) {
        Err(PipelineError::IndexOutOfBounds { index, len }) => {
            assert_eq!(index, 1);
            assert_eq!(len, 1);
        }
        other => panic!("Expected IndexOutOfBounds, got {:?}", other),
    }
}
