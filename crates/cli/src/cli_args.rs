//! Command-line argument parsing and validation.
//!
//! This module defines the command-line interface structure. The CLI stands
//! in for the image editor: it accepts the same two export parameters a host
//! dialog would (output extension and quality) plus the image to export.

use std::path::Path;

use clap::Parser;
use guetzli_export_core::canvas::{Canvas, DiskCanvas, SnapshotCanvas};
use guetzli_export_core::error::Result;
use guetzli_export_core::export::{ExportOptions, DEFAULT_EXTENSION, DEFAULT_QUALITY};
use guetzli_export_core::validator::validate_file_type;

/// Command-line arguments for the guetzli-export CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use guetzli_export_cli::cli_args::Args;
///
/// let args = Args::parse_from(["gexport", "photo.png", "-q", "90"]);
/// assert_eq!(args.quality, 90);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the configuration YAML.
    ///
    /// If not provided, defaults to `~/.guetzli-export/config.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Directory searched for the guetzli executable.
    ///
    /// If not provided, the directory holding the configuration file is used.
    #[arg(long, short = 't')]
    pub tool_directory: Option<String>,

    /// Extension of the exported file, replacing the image's own.
    #[arg(long, short = 'e', default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Compression quality passed to the tool.
    #[arg(
        long,
        short = 'q',
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(84..=100)
    )]
    pub quality: u8,

    /// Perform a dry run, which just prints out the command but does not execute it.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,

    /// Pixel width of the image. With `--height`, the image file is not opened.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Pixel height of the image. With `--width`, the image file is not opened.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Treat the image as having unsaved changes.
    #[arg(long, action, requires = "width")]
    pub dirty: bool,

    /// The image file to export.
    pub image: String,
}

impl Args {
    /// The canvas described by the arguments: a fixed stand-in when the
    /// dimensions are given, otherwise the image file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the image file has to be opened and cannot be
    /// read. A file whose suffix is not in `accepted_suffixes` is rejected
    /// before it is opened.
    pub fn canvas(&self, accepted_suffixes: &[String]) -> Result<Box<dyn Canvas>> {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            let canvas =
                SnapshotCanvas::new(&self.image, width, height).with_unsaved_changes(self.dirty);
            return Ok(Box::new(canvas));
        }

        validate_file_type(Path::new(&self.image), accepted_suffixes)?;
        Ok(Box::new(DiskCanvas::open(&self.image)?))
    }

    #[must_use]
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            extension: self.extension.clone(),
            quality: self.quality,
        }
    }
}
