//! Checks run before the tool is looked up or launched.

use std::path::Path;

use crate::canvas::Canvas;
use crate::error::{Error, Result};

/// Fails unless the canvas is a saved file with an accepted suffix.
///
/// Unsaved changes are reported before an unsupported suffix, since saving
/// is what the user has to do first either way. Suffixes are compared
/// case-sensitively against the end of the full path.
///
/// # Errors
///
/// Returns [`Error::MissingFilePath`], [`Error::UnsavedChanges`] or
/// [`Error::UnsupportedFileType`].
pub fn validate(canvas: &dyn Canvas, accepted_suffixes: &[String]) -> Result<()> {
    let Some(path) = canvas.file_path() else {
        return Err(Error::MissingFilePath);
    };

    let name = path.to_string_lossy();

    if canvas.has_unsaved_changes() {
        return Err(Error::UnsavedChanges(name.to_string()));
    }

    validate_file_type(path, accepted_suffixes)
}

/// Fails unless `path` ends with one of `accepted_suffixes`. Usable before
/// the file is opened, so an unsupported image is never decoded.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFileType`].
pub fn validate_file_type(path: &Path, accepted_suffixes: &[String]) -> Result<()> {
    let name = path.to_string_lossy();

    if !accepted_suffixes
        .iter()
        .any(|suffix| name.ends_with(suffix.as_str()))
    {
        return Err(Error::UnsupportedFileType(name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::SnapshotCanvas;

    fn suffixes() -> Vec<String> {
        vec![".png".to_string(), ".jpg".to_string()]
    }

    #[test]
    fn test_accepts_saved_supported_file() {
        let canvas = SnapshotCanvas::new("test.png", 800, 617);
        assert!(validate(&canvas, &suffixes()).is_ok());
    }

    #[test]
    fn test_rejects_unsaved_changes_even_with_valid_suffix() {
        let canvas = SnapshotCanvas::new("test.png", 800, 617).with_unsaved_changes(true);
        assert!(matches!(
            validate(&canvas, &suffixes()),
            Err(Error::UnsavedChanges(_))
        ));
    }

    #[test]
    fn test_unsaved_reported_before_suffix() {
        let canvas = SnapshotCanvas::new("test.gif", 800, 617).with_unsaved_changes(true);
        assert!(matches!(
            validate(&canvas, &suffixes()),
            Err(Error::UnsavedChanges(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_suffix_when_saved() {
        let canvas = SnapshotCanvas::new("test.gif", 800, 617);
        assert!(matches!(
            validate(&canvas, &suffixes()),
            Err(Error::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        let canvas = SnapshotCanvas::new("TEST.PNG", 800, 617);
        assert!(matches!(
            validate(&canvas, &suffixes()),
            Err(Error::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_rejects_missing_path() {
        let mut canvas = SnapshotCanvas::new("test.png", 800, 617);
        canvas.file_path = None;
        assert!(matches!(
            validate(&canvas, &suffixes()),
            Err(Error::MissingFilePath)
        ));
    }

    #[test]
    fn test_file_type_checked_without_canvas() {
        assert!(validate_file_type(Path::new("photo.png"), &suffixes()).is_ok());
        assert!(matches!(
            validate_file_type(Path::new("photo.gif"), &suffixes()),
            Err(Error::UnsupportedFileType(_))
        ));
    }
}
