// mripipe-data/src/test_utils.rs
//
// Helpers to lay out small data directories on disk for tests.

use crate::datasets::DataLayout;
use image::{GrayImage, Luma};
use log::{Level, LevelFilter, Log, Metadata, Record};
use mripipe_core::{Grid, Sample};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// One manifest row plus the records to create for it.
pub(crate) struct SubjectSpec<'a> {
    pub subject_id: &'a str,
    pub annotation_set_id: &'a str,
    /// Sequence indices of the image records written under the subject directory.
    pub images: &'a [u32],
    /// Sequence indices that get a contour file.
    pub contours: &'a [u32],
}

/// Forwards to `env_logger` and keeps a copy of every record for assertions.
struct CapturingLogger {
    inner: env_logger::Logger,
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
        if self.inner.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static LOGGER: OnceCell<&'static CapturingLogger> = OnceCell::new();

fn logger() -> &'static CapturingLogger {
    LOGGER.get_or_init(|| {
        let logger: &'static CapturingLogger = Box::leak(Box::new(CapturingLogger {
            inner: env_logger::builder().is_test(true).build(),
            records: Mutex::new(Vec::new()),
        }));
        if log::set_logger(logger).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
        logger
    })
}

/// Installs the test logger once per test binary.
pub(crate) fn init_logger() {
    logger();
}

/// Messages logged so far at exactly `level` that contain `needle`.
///
/// Tests run in parallel, so `needle` should be unique to the calling test.
pub(crate) fn captured_logs(level: Level, needle: &str) -> Vec<String> {
    let records = logger().records.lock().unwrap();
    records
        .iter()
        .filter(|(l, msg)| *l == level && msg.contains(needle))
        .map(|(_, msg)| msg.clone())
        .collect()
}

pub(crate) fn write_png(path: &Path, width: u32, height: u32) {
    let image = GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]));
    image.save(path).expect("Failed to write test PNG");
}

/// A closed rectangle, one vertex per line.
pub(crate) fn write_rectangle_contour(path: &Path, x0: f64, y0: f64, x1: f64, y1: f64) {
    let text = format!(
        "{x0:.2} {y0:.2}\n{x1:.2} {y0:.2}\n{x1:.2} {y1:.2}\n{x0:.2} {y1:.2}\n"
    );
    fs::write(path, text).expect("Failed to write test contour");
}

/// Creates a data directory with the default layout: manifest, 16x12 PNG records and
/// rectangular contour files.
pub(crate) fn build_data_dir(subjects: &[SubjectSpec<'_>]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let layout = DataLayout::default();

    let mut manifest = String::from("patient_id,original_id\n");
    for subject in subjects {
        manifest.push_str(&format!("{},{}\n", subject.subject_id, subject.annotation_set_id));

        let subject_dir = layout.image_root(dir.path()).join(subject.subject_id);
        fs::create_dir_all(&subject_dir).unwrap();
        for n in subject.images {
            write_png(&subject_dir.join(format!("{}.png", n)), 16, 12);
        }

        let contour_dir = layout
            .annotation_root(dir.path())
            .join(subject.annotation_set_id)
            .join(&layout.annotation_subdir);
        fs::create_dir_all(&contour_dir).unwrap();
        for n in subject.contours {
            write_rectangle_contour(
                &contour_dir.join(layout.annotation_file_name(*n)),
                2.0,
                2.0,
                7.0,
                5.0,
            );
        }
    }
    fs::write(layout.manifest_path(dir.path()), manifest).unwrap();
    dir
}

/// A 1x1 sample whose single pixel carries `value`, to track samples through a pipeline.
pub(crate) fn tagged_sample(value: f32) -> Sample {
    Sample::new(Grid::filled(1, 1, value), Grid::filled(1, 1, true)).unwrap()
}
