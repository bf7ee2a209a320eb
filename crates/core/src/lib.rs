//! Guetzli Export Core Library
//!
//! This crate exports an image with an external compression tool (guetzli)
//! that ships next to the plugin. It finds the real tool binary, builds its
//! command line from configuration, and runs it on a background thread while
//! reporting simulated progress, since the tool reports none itself.
//!
//! # Key Features
//!
//! - **Configuration**: YAML document with the tool search pattern, parameters and accepted suffixes
//! - **Tool Discovery**: Picks the first matching file above a size floor, skipping placeholders
//! - **Argument Assembly**: Ordered parameters, quality override, quoted input and output paths
//! - **Progress Estimation**: Cyclic indicator stepped from the image's pixel count
//! - **Supervised Execution**: Background run polled at a fixed interval, output captured on failure
//! - **Validation**: Unsaved or unsupported images are rejected before anything runs
//!
//! # Examples
//!
//! ```no_run
//! use guetzli_export_core::canvas::DiskCanvas;
//! use guetzli_export_core::config::{load_config, search_directory};
//! use guetzli_export_core::export::{ExportOptions, Exporter};
//! use guetzli_export_core::progress::LogProgress;
//!
//! let config_path = "/opt/guetzli-export/config.yml";
//! let config = load_config(config_path)?;
//! let mut exporter = Exporter::new(&config, search_directory(config_path, &None));
//!
//! let canvas = DiskCanvas::open("photo.png")?;
//! exporter.export(&canvas, &ExportOptions::default(), &mut LogProgress::default())?;
//! # Ok::<(), guetzli_export_core::error::Error>(())
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod export;
pub mod locator;
pub mod progress;
pub mod request;
pub mod supervisor;
pub mod validator;
