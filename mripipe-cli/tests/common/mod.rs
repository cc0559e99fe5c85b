// mripipe-cli/tests/common/mod.rs
#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SUBJECT: &str = "SCD0000101";
pub const ANNOTATION_SET: &str = "SC-HF-I-1";

/// Writes a data directory with one subject, `images` PNG records and contour files
/// for the sequence indices in `contours`.
pub fn data_dir(images: &[u32], contours: &[u32]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("link.csv"),
        format!("patient_id,original_id\n{},{}\n", SUBJECT, ANNOTATION_SET),
    )
    .unwrap();

    let subject_dir = dir.path().join("dicoms").join(SUBJECT);
    fs::create_dir_all(&subject_dir).unwrap();
    for n in images {
        let image = GrayImage::from_fn(16, 12, |x, y| Luma([(x * 10 + y) as u8]));
        image.save(subject_dir.join(format!("{}.png", n))).unwrap();
    }

    let contour_dir = dir
        .path()
        .join("contourfiles")
        .join(ANNOTATION_SET)
        .join("i-contours");
    fs::create_dir_all(&contour_dir).unwrap();
    for n in contours {
        fs::write(
            contour_dir.join(format!("IM-0001-{:04}-icontour-manual.txt", n)),
            "2.0 2.0\n7.0 2.0\n7.0 5.0\n2.0 5.0\n",
        )
        .unwrap();
    }
    dir
}

pub fn argv<'a>(data_dir: &'a Path, extra: &[&'a str]) -> Vec<String> {
    let mut args = vec![
        "mripipe".to_string(),
        "--data-dir".to_string(),
        data_dir.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    args
}
