//! Integration tests for guetzli-export-core
//!
//! These tests drive the whole export pipeline from a configuration file on
//! disk through tool discovery to a real child process.

use guetzli_export_core::{
    canvas::SnapshotCanvas,
    config::{load_config, search_directory},
    error::Error,
    export::{ExportOptions, Exporter},
    progress::{ProgressSink, ProgressState},
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Records everything the exporter reports.
#[derive(Default)]
struct RecordingProgress {
    labels: Vec<String>,
    updates: Vec<ProgressState>,
    finished: usize,
}

impl ProgressSink for RecordingProgress {
    fn begin(&mut self, label: &str) {
        self.labels.push(label.to_string());
    }

    fn update(&mut self, state: &ProgressState) {
        self.updates.push(*state);
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}

fn write_config(directory: &Path, contents: &str) -> String {
    let path = directory.join("config.yml");
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

/// The reference scenario: a saved 800x617 PNG exported at quality 95.
/// The located "tool" is not executable, so the shell reports the failure
/// and its message comes back as captured output.
#[cfg(unix)]
#[test]
fn test_failed_run_surfaces_captured_output() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 16
  download_hint: "https://github.com/google/guetzli/releases"
  new_shell: true
  suffixes: [".png", ".jpg"]
progress:
  poll_interval_ms: 10
"#,
    );
    fs::write(temp_dir.path().join("guetzli"), vec![b'#'; 64]).unwrap();

    let config = load_config(&config_path).unwrap();
    let mut exporter = Exporter::new(&config, search_directory(&config_path, &None));
    let canvas = SnapshotCanvas::new("test.png", 800, 617);
    let options = ExportOptions {
        extension: ".jpeg".to_string(),
        quality: 95,
    };

    let request = exporter.prepare(&canvas, &options).unwrap();
    let arguments = request.arguments();
    assert_eq!(arguments[arguments.len() - 2], "\"test.png\"");
    assert_eq!(arguments[arguments.len() - 1], "\"test.jpeg\"");

    let mut progress = RecordingProgress::default();
    let result = exporter.export(&canvas, &options, &mut progress);

    match result {
        Err(Error::Execution { exit_code, output }) => {
            assert_ne!(exit_code, 0);
            assert!(!output.trim().is_empty());
        }
        other => panic!("expected Execution error, got {other:?}"),
    }
    assert_eq!(progress.labels.len(), 1);
    assert_eq!(progress.finished, 1);
}

/// The tool directory name holds a `$`. Through the shell the executable
/// path must be quoted and escaped, or the name is expanded and the tool is
/// not found.
#[cfg(unix)]
#[test]
fn test_shell_run_from_directory_with_dollar_sign() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 16
  new_shell: true
  suffixes: [".png"]
progress:
  poll_interval_ms: 10
"#,
    );
    let tool_dir = temp_dir.path().join("tools$x");
    fs::create_dir(&tool_dir).unwrap();
    std::os::unix::fs::symlink("/bin/true", tool_dir.join("guetzli")).unwrap();

    let config = load_config(&config_path).unwrap();
    let mut exporter = Exporter::new(&config, &tool_dir);
    let canvas = SnapshotCanvas::new("test.png", 800, 617);
    let mut progress = RecordingProgress::default();

    let result = exporter
        .export(&canvas, &ExportOptions::default(), &mut progress)
        .unwrap();

    assert_eq!(result.exit_code, 0);
    assert_eq!(progress.finished, 1);
}

/// A symlink to `sh` stands in for the tool. The configured parameters make
/// it sleep and then fail, so progress ticks are reported on the way.
#[cfg(unix)]
#[test]
fn test_progress_ticks_while_tool_runs() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 1024
  suffixes: [".png"]
  parameters:
    "-c": "sleep 0.4; echo 'butteraugli failed' >&2; exit 4"
progress:
  seconds_per_megapixel: 60
  poll_interval_ms: 20
"#,
    );
    fs::write(temp_dir.path().join("guetzli.placeholder"), b"placeholder").unwrap();
    std::os::unix::fs::symlink("/bin/sh", temp_dir.path().join("guetzli")).unwrap();

    let config = load_config(&config_path).unwrap();
    let mut exporter = Exporter::new(&config, temp_dir.path());
    let canvas = SnapshotCanvas::new("photo.png", 800, 617);
    let mut progress = RecordingProgress::default();

    let result = exporter.export(&canvas, &ExportOptions::default(), &mut progress);

    match result {
        Err(Error::Execution { exit_code, output }) => {
            assert_eq!(exit_code, 4);
            assert!(output.contains("butteraugli failed"));
        }
        other => panic!("expected Execution error, got {other:?}"),
    }

    assert!(progress.updates.len() >= 5);
    for state in &progress.updates {
        assert!(state.current() >= rust_decimal::Decimal::ZERO);
        assert!(state.current() < rust_decimal::Decimal::ONE);
    }
    assert!(progress.updates[1].current() > progress.updates[0].current());
}

/// Zero-pixel images have no progress step: the run still completes but no
/// updates are reported.
#[cfg(unix)]
#[test]
fn test_zero_pixel_canvas_reports_no_progress() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
command:
  search_pattern: "guetzli"
  size_floor_bytes: 1024
  suffixes: [".png"]
  parameters:
    "-c": "sleep 0.1"
progress:
  poll_interval_ms: 10
"#,
    );
    std::os::unix::fs::symlink("/bin/sh", temp_dir.path().join("guetzli")).unwrap();

    let config = load_config(&config_path).unwrap();
    let mut exporter = Exporter::new(&config, temp_dir.path());
    let canvas = SnapshotCanvas::new("empty.png", 0, 0);
    let mut progress = RecordingProgress::default();

    let result = exporter
        .export(&canvas, &ExportOptions::default(), &mut progress)
        .unwrap();

    assert_eq!(result.exit_code, 0);
    assert!(result.captured_output.is_none());
    assert!(progress.updates.is_empty());
    assert_eq!(progress.finished, 1);
}

#[test]
fn test_unsaved_canvas_never_reaches_locator() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 16
  suffixes: [".png"]
"#,
    );

    let config = load_config(&config_path).unwrap();
    let mut exporter = Exporter::new(&config, temp_dir.path());
    let canvas = SnapshotCanvas::new("test.png", 800, 617).with_unsaved_changes(true);
    let mut progress = RecordingProgress::default();

    let result = exporter.export(&canvas, &ExportOptions::default(), &mut progress);

    assert!(matches!(result, Err(Error::UnsavedChanges(_))));
    assert!(progress.labels.is_empty());
}

#[test]
fn test_missing_tool_reports_download_hint() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 100000
  download_hint: "https://github.com/google/guetzli/releases"
  suffixes: [".png"]
"#,
    );
    fs::write(temp_dir.path().join("guetzli"), b"placeholder").unwrap();

    let config = load_config(&config_path).unwrap();
    let exporter = Exporter::new(&config, temp_dir.path());
    let canvas = SnapshotCanvas::new("test.png", 800, 617);

    let error = exporter
        .prepare(&canvas, &ExportOptions::default())
        .unwrap_err();

    assert!(matches!(error, Error::NotFound { .. }));
    assert!(error
        .to_string()
        .contains("https://github.com/google/guetzli/releases"));
}
