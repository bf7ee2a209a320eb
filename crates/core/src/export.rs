//! The export entry point a host calls: validate, find the tool, build the
//! command line, run it with simulated progress.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::canvas::{Canvas, CanvasSnapshot};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::locator::locate_for;
use crate::progress::{compute_step, ProgressSink, ProgressState};
use crate::request::{self, ExecutionRequest};
use crate::supervisor::{ExecutionResult, Supervisor};
use crate::validator::validate;

/// Output extension used when the caller does not pick one
pub const DEFAULT_EXTENSION: &str = ".jpeg";

/// Quality used when the caller does not pick one
pub const DEFAULT_QUALITY: u8 = 95;

/// Recommended quality range; the tool itself refuses values below 84
pub const QUALITY_RANGE: std::ops::RangeInclusive<u8> = 84..=100;

/// Label shown on the progress indicator
pub const PROGRESS_LABEL: &str = "Save guetzli ...";

/// What the caller chooses for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub extension: String,
    pub quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            quality: DEFAULT_QUALITY,
        }
    }
}

pub struct Exporter<'a> {
    config: &'a Config,
    search_directory: PathBuf,
    supervisor: Supervisor,
}

impl<'a> Exporter<'a> {
    pub fn new<P: Into<PathBuf>>(config: &'a Config, search_directory: P) -> Self {
        let supervisor = Supervisor::new().with_poll_interval(config.progress.poll_interval());

        Self {
            config,
            search_directory: search_directory.into(),
            supervisor,
        }
    }

    #[must_use]
    pub fn search_directory(&self) -> &Path {
        &self.search_directory
    }

    /// Validates the canvas, locates the tool and builds the request without
    /// running anything.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unsaved or unsupported image and
    /// [`Error::NotFound`] when the tool is missing.
    pub fn prepare(&self, canvas: &dyn Canvas, options: &ExportOptions) -> Result<ExecutionRequest> {
        let spec = &self.config.command;

        validate(canvas, &spec.suffixes)?;
        let input_path = canvas.file_path().ok_or(Error::MissingFilePath)?;

        let executable = locate_for(&self.search_directory, spec)?;
        let request = request::build(
            &executable,
            spec,
            options.quality,
            input_path,
            &options.extension,
        );

        debug!("Prepared request: {request:?}");
        Ok(request)
    }

    /// Runs one export, reporting progress to `sink` once per poll tick.
    ///
    /// The canvas is read once, when the export starts.
    ///
    /// # Errors
    ///
    /// Any error from [`Exporter::prepare`], or [`Error::Execution`] when the
    /// tool fails.
    pub fn export(
        &mut self,
        canvas: &dyn Canvas,
        options: &ExportOptions,
        sink: &mut dyn ProgressSink,
    ) -> Result<ExecutionResult> {
        let snapshot = CanvasSnapshot::of(canvas);
        info!("Exporting {snapshot}");

        let request = self.prepare(&snapshot, options)?;

        let step = compute_step(
            snapshot.pixel_count(),
            self.config.progress.seconds_per_megapixel,
        );
        let mut progress = step.map(ProgressState::new);

        sink.begin(PROGRESS_LABEL);
        let result = self.supervisor.run(&request, || {
            if let Some(progress) = progress.as_mut() {
                progress.advance();
                sink.update(progress);
            }
        });
        sink.finish();

        if result.is_ok() {
            info!("Wrote {}", request.output_path);
        }

        result
    }
}
