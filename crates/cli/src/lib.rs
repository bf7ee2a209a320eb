//! Guetzli Export CLI Library
//!
//! This crate provides the command-line front end for guetzli-export. It
//! plays the part an image editor would: it describes the image to export,
//! collects the export options and shows the progress of the tool run.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and canvas selection
//! - [`progress`]: Single-line terminal progress bar
//!
//! # Examples
//!
//! ```bash
//! # Export next to the source file as photo.jpeg at quality 95
//! gexport photo.png
//!
//! # Pick extension and quality, use a specific configuration
//! gexport -c ~/plugins/guetzli/config.yml -e .jpg -q 90 photo.png
//!
//! # Show the command line without running it
//! gexport --dry-run photo.png
//!
//! # Skip reading the image header by giving the dimensions
//! gexport --width 800 --height 617 photo.png
//! ```

pub mod cli_args;
pub mod progress;
