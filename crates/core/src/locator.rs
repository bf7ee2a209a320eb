//! Finds the compression tool among the files of a directory.
//!
//! The tool directory may hold a small placeholder with the same name as the
//! real binary (for example one committed to a repository so the directory
//! exists). File size is the cheap way to tell them apart: only a candidate
//! strictly larger than the configured floor is accepted.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, info};

use crate::config::CommandSpec;
use crate::error::{Error, Result};

/// Returns the first file in `directory` whose name matches `name_pattern`
/// and whose size is strictly greater than `size_floor_bytes`.
///
/// Files are visited in directory enumeration order. Nothing is cached.
///
/// # Errors
///
/// Returns [`Error::Pattern`] for an invalid glob and [`Error::NotFound`]
/// when no file qualifies, including when the directory cannot be read.
pub fn locate(
    directory: &Path,
    name_pattern: &str,
    size_floor_bytes: u64,
    download_hint: &str,
) -> Result<PathBuf> {
    let pattern =
        Pattern::new(name_pattern).map_err(|e| Error::Pattern(name_pattern.to_string(), e))?;

    let not_found = || {
        Error::not_found(
            directory.display().to_string(),
            name_pattern.to_string(),
            download_hint.to_string(),
        )
    };

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read tool directory `{}`: {e}", directory.display());
            return Err(not_found());
        }
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        if !pattern.matches(file_name) {
            continue;
        }

        let path = entry.path();
        // Follows symlinks, so a linked tool counts with its target's size.
        let Ok(metadata) = fs::metadata(&path) else {
            continue;
        };

        if !metadata.is_file() {
            continue;
        }

        if metadata.len() > size_floor_bytes {
            info!("Using tool `{}` ({} bytes)", path.display(), metadata.len());
            return Ok(path);
        }

        debug!(
            "Skipping `{file_name}`: {} bytes is not above the {size_floor_bytes} byte floor",
            metadata.len()
        );
    }

    Err(not_found())
}

/// [`locate`] with the pattern, floor and hint taken from the configuration.
///
/// # Errors
///
/// See [`locate`].
pub fn locate_for(directory: &Path, spec: &CommandSpec) -> Result<PathBuf> {
    locate(
        directory,
        &spec.search_pattern,
        spec.size_floor_bytes,
        &spec.download_hint,
    )
}
