//! The image being exported, as seen by the export pipeline.
//!
//! A [`Canvas`] hides whether the image comes from a live editor session or
//! a fixed stand-in. The pipeline only needs the file path, the pixel
//! dimensions and whether there are unsaved changes.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

pub trait Canvas {
    fn file_path(&self) -> Option<&Path>;

    fn pixel_width(&self) -> u32;

    fn pixel_height(&self) -> u32;

    fn has_unsaved_changes(&self) -> bool;

    fn pixel_count(&self) -> u64 {
        u64::from(self.pixel_width()) * u64::from(self.pixel_height())
    }
}

/// Read-only values taken from a [`Canvas`] when an export starts.
///
/// The export never looks at the canvas again, so edits made while the tool
/// runs do not change the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSnapshot {
    pub file_path: Option<PathBuf>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub has_unsaved_changes: bool,
}

impl CanvasSnapshot {
    pub fn of(canvas: &dyn Canvas) -> Self {
        Self {
            file_path: canvas.file_path().map(Path::to_path_buf),
            pixel_width: canvas.pixel_width(),
            pixel_height: canvas.pixel_height(),
            has_unsaved_changes: canvas.has_unsaved_changes(),
        }
    }
}

impl Canvas for CanvasSnapshot {
    fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }
}

impl Display for CanvasSnapshot {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.file_path {
            Some(path) => write!(formatter, "`{}`", path.display())?,
            None => formatter.write_str("<unsaved image>")?,
        }

        write!(formatter, " ({}x{})", self.pixel_width, self.pixel_height)?;

        if self.has_unsaved_changes {
            formatter.write_str(" *")?;
        }

        Ok(())
    }
}

/// A fixed stand-in for headless runs and tests.
pub type SnapshotCanvas = CanvasSnapshot;

impl SnapshotCanvas {
    pub fn new<P: Into<PathBuf>>(file_path: P, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            file_path: Some(file_path.into()),
            pixel_width,
            pixel_height,
            has_unsaved_changes: false,
        }
    }

    #[must_use]
    pub fn with_unsaved_changes(mut self, has_unsaved_changes: bool) -> Self {
        self.has_unsaved_changes = has_unsaved_changes;
        self
    }
}

/// An image file on disk. Its dimensions come from the image header and it
/// never has unsaved changes.
#[derive(Debug, Clone)]
pub struct DiskCanvas {
    path: PathBuf,
    pixel_width: u32,
    pixel_height: u32,
}

impl DiskCanvas {
    /// Opens `path` and reads the image dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageDimensions`] if the file cannot be read or its
    /// format is not recognised.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let (pixel_width, pixel_height) = image::image_dimensions(&path)
            .map_err(|e| Error::ImageDimensions(path.display().to_string(), e))?;

        debug!("Opened `{}` ({pixel_width}x{pixel_height})", path.display());

        Ok(Self {
            path,
            pixel_width,
            pixel_height,
        })
    }
}

impl Canvas for DiskCanvas {
    fn file_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    fn has_unsaved_changes(&self) -> bool {
        false
    }
}
