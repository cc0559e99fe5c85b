use std::path::PathBuf;
use thiserror::Error;

/// How the pipeline reacts to a given [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration or input problem the caller must fix. Aborts the run.
    Fatal,
    /// Affects a single record only. The record is skipped and the run continues.
    PerRecord,
    /// Anything the pipeline did not anticipate (I/O on internal files, worker panics, ...).
    Internal,
}

/// Custom error type for the mripipe workspace.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Manifest error in '{path}': {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Directory not found: '{path}'")]
    MissingDirectory { path: PathBuf },

    #[error("Cannot extract a sequence index from record '{path}': {reason}")]
    UnparsableRecord { path: PathBuf, reason: String },

    #[error("Failed to decode image '{path}': {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Malformed annotation file '{path}' at line {line}: {reason}")]
    AnnotationParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Image '{path}' has unusable dimensions {width}x{height}")]
    DimensionMismatch {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    #[error("Shape mismatch: expected {expected:?} (height, width), got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Index out of bounds: index {index} for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write diagnostics: {0}")]
    Diagnostics(String),

    #[error("Training step failed: {0}")]
    TrainingStep(String),

    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("Epoch cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Classifies the error according to the propagation policy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Manifest { .. }
            | PipelineError::MissingDirectory { .. }
            | PipelineError::InvalidConfig(_) => ErrorKind::Fatal,
            PipelineError::UnparsableRecord { .. }
            | PipelineError::Decode { .. }
            | PipelineError::AnnotationParse { .. }
            | PipelineError::DimensionMismatch { .. }
            | PipelineError::ShapeMismatch { .. } => ErrorKind::PerRecord,
            PipelineError::Io { .. }
            | PipelineError::IndexOutOfBounds { .. }
            | PipelineError::Diagnostics(_)
            | PipelineError::TrainingStep(_)
            | PipelineError::WorkerPanicked(_)
            | PipelineError::Cancelled => ErrorKind::Internal,
        }
    }

    /// Short, stable label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineError::Manifest { .. } => "manifest",
            PipelineError::MissingDirectory { .. } => "missing-directory",
            PipelineError::UnparsableRecord { .. } => "unparsable-record",
            PipelineError::Decode { .. } => "decode",
            PipelineError::AnnotationParse { .. } => "annotation-parse",
            PipelineError::DimensionMismatch { .. } => "dimension-mismatch",
            PipelineError::ShapeMismatch { .. } => "shape-mismatch",
            PipelineError::Io { .. } => "io",
            PipelineError::IndexOutOfBounds { .. } => "index-out-of-bounds",
            PipelineError::InvalidConfig(_) => "invalid-config",
            PipelineError::Diagnostics(_) => "diagnostics",
            PipelineError::TrainingStep(_) => "training-step",
            PipelineError::WorkerPanicked(_) => "worker-panicked",
            PipelineError::Cancelled => "cancelled",
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
