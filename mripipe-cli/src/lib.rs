// mripipe-cli/src/lib.rs
//! Command surface of the training pipeline: argument parsing, logger setup and the
//! mapping from run outcomes to process exit codes.

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use log::{error, info, Level};
use mripipe_core::{BoundaryPolicy, ErrorKind, PipelineError, RasterImageDecoder, ScanlineRasterizer};
use mripipe_data::pipeline::panic_message;
use mripipe_data::{
    train, CancelToken, DataLayout, Dataset, DatasetIndex, DiagnosticsWriter, LoggingTrainingStep,
    PipelineConfig, SampleLoader, TrainingReport,
};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::ffi::OsString;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mripipe",
    version,
    about = "Stream MRI image/contour pairs into training batches"
)]
pub struct CliArgs {
    /// Data directory holding the manifest, image records and contour files.
    #[arg(long)]
    pub data_dir: PathBuf,
    /// Existing directory receiving an image and an overlay per loaded sample.
    #[arg(long)]
    pub idir: Option<PathBuf>,
    /// Log level: error, warn (or warning), info, debug or trace.
    #[arg(long, default_value = "info")]
    pub log: String,
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,
    /// Maximum number of batches waiting between loading and training.
    #[arg(long, default_value_t = 10)]
    pub queue_capacity: usize,
    /// Seed for reproducible draw orders; epoch `e` uses `seed + e`.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Accepted image-record extension. Repeat to accept several.
    #[arg(long = "record-ext", default_value = "png")]
    pub record_ext: Vec<String>,
    /// Count pixels on the contour outline as part of the mask.
    #[arg(long)]
    pub include_boundary: bool,
}

impl CliArgs {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            epochs: self.epochs,
            batch_size: self.batch_size,
            queue_capacity: self.queue_capacity,
            seed: self.seed,
            ..PipelineConfig::default()
        }
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout {
            record_extensions: self.record_ext.clone(),
            ..DataLayout::default()
        }
    }

    pub fn boundary_policy(&self) -> BoundaryPolicy {
        if self.include_boundary {
            BoundaryPolicy::Include
        } else {
            BoundaryPolicy::Exclude
        }
    }
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitStatus {
    Success = 0,
    /// Bad arguments or input data the user can fix.
    UserError = 1,
    /// Internal failure, including panics.
    Unexpected = 2,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid log level '{0}' (expected error, warn, warning, info, debug or trace)")]
    InvalidLogLevel(String),

    #[error("Data directory not found: '{}'", .0.display())]
    DataDirNotFound(PathBuf),

    #[error("Diagnostics directory not found: '{}'", .0.display())]
    DiagnosticsDirNotFound(PathBuf),

    #[error("No image/contour pairs found under '{}'", .0.display())]
    EmptyDataset(PathBuf),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl CliError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CliError::Pipeline(e) if e.kind() != ErrorKind::Fatal => ExitStatus::Unexpected,
            _ => ExitStatus::UserError,
        }
    }
}

static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// `warning` is accepted as a spelling of `warn`.
fn parse_level(level: &str) -> Result<Level, CliError> {
    if level.eq_ignore_ascii_case("warning") {
        return Ok(Level::Warn);
    }
    level
        .parse()
        .map_err(|_| CliError::InvalidLogLevel(level.to_string()))
}

/// Installs the process logger once. Later calls only validate `level`.
pub fn init_logging(level: &str) -> Result<(), CliError> {
    let level = parse_level(level)?;
    LOGGER_INITIALIZED.get_or_init(|| {
        if let Err(e) = env_logger::Builder::new()
            .filter_level(level.to_level_filter())
            .try_init()
        {
            eprintln!("Failed to initialize logger: {}", e);
        }
    });
    Ok(())
}

/// Validates the paths, indexes the data directory and trains for the configured
/// number of epochs.
pub fn run(args: &CliArgs) -> Result<TrainingReport, CliError> {
    if !args.data_dir.is_dir() {
        return Err(CliError::DataDirNotFound(args.data_dir.clone()));
    }
    let diagnostics = match &args.idir {
        Some(dir) if !dir.is_dir() => return Err(CliError::DiagnosticsDirNotFound(dir.clone())),
        Some(dir) => Some(DiagnosticsWriter::new(dir.clone())?),
        None => None,
    };

    let index = DatasetIndex::from_data_dir(&args.data_dir, &args.layout())?;
    if index.is_empty() {
        return Err(CliError::EmptyDataset(args.data_dir.clone()));
    }

    let mut loader = SampleLoader::new(
        RasterImageDecoder::default(),
        ScanlineRasterizer::new(args.boundary_policy()),
    );
    if let Some(writer) = diagnostics {
        loader = loader.with_diagnostics(writer);
    }

    let mut step = LoggingTrainingStep::new();
    let report = train(
        &index,
        &loader,
        &mut step,
        &args.pipeline_config(),
        &CancelToken::new(),
    )?;
    info!(
        "Finished {} epochs: {} batches, {} samples",
        report.epochs.len(),
        report.total_batches(),
        report.total_samples()
    );
    Ok(report)
}

fn internal_failure_message(payload: &(dyn Any + Send)) -> String {
    format!("Unexpected internal failure: {}", panic_message(payload))
}

/// Parses `args` (program name first), runs the pipeline and returns the exit status.
pub fn main_with_args<I, T>(args: I) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match CliArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitStatus::Success,
                _ => ExitStatus::UserError,
            };
        }
    };

    if let Err(e) = init_logging(&args.log) {
        eprintln!("{}", e);
        return e.exit_status();
    }

    match panic::catch_unwind(AssertUnwindSafe(|| run(&args))) {
        Ok(Ok(_)) => ExitStatus::Success,
        Ok(Err(e)) => {
            error!("{}", e);
            e.exit_status()
        }
        Err(payload) => {
            error!("{}", internal_failure_message(payload.as_ref()));
            ExitStatus::Unexpected
        }
    }
}
