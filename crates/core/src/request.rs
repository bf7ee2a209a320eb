//! Turns configuration and export options into the tool's command line.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::Command;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::config::CommandSpec;
#[cfg(not(windows))]
use crate::config::DEFAULT_SHELL;

/// A path rendered in double quotes so a shell keeps embedded spaces intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedPath {
    raw: PathBuf,
}

impl QuotedPath {
    pub fn new<P: Into<PathBuf>>(raw: P) -> Self {
        Self { raw: raw.into() }
    }

    /// The path without quotes, for direct process invocation.
    #[must_use]
    pub fn raw(&self) -> &Path {
        &self.raw
    }
}

impl Display for QuotedPath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let raw = self.raw.to_string_lossy();

        formatter.write_str("\"")?;
        for c in raw.chars() {
            // cmd.exe has no escape inside quotes and paths cannot hold `"` there
            if cfg!(not(windows)) && matches!(c, '"' | '\\' | '$' | '`') {
                formatter.write_str("\\")?;
            }
            write!(formatter, "{c}")?;
        }
        formatter.write_str("\"")
    }
}

/// Everything needed to run the tool once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub executable_path: PathBuf,
    pub ordered_arguments: Vec<(String, String)>,
    pub input_path: QuotedPath,
    pub output_path: QuotedPath,
    pub use_shell: bool,
}

impl ExecutionRequest {
    /// `[executable, flag, value, ..., "input", "output"]`
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        let mut arguments = Vec::with_capacity(self.ordered_arguments.len() * 2 + 3);
        arguments.push(self.executable_path.to_string_lossy().to_string());

        for (flag, value) in &self.ordered_arguments {
            arguments.push(flag.clone());
            arguments.push(value.clone());
        }

        arguments.push(self.input_path.to_string());
        arguments.push(self.output_path.to_string());
        arguments
    }

    /// The single string handed to the shell. The executable is quoted like
    /// the paths, so nothing in the tool directory name gets expanded.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut arguments = self.arguments();
        arguments[0] = QuotedPath::new(&self.executable_path).to_string();

        arguments.iter().join(" ")
    }

    /// Builds the process to spawn. Through a shell the quoted command line
    /// is passed as one string; otherwise every argument is passed as-is and
    /// the paths go unquoted.
    #[must_use]
    pub fn to_command(&self) -> Command {
        if self.use_shell {
            let mut command = shell_command();
            command.arg(self.command_line());
            return command;
        }

        let mut command = Command::new(&self.executable_path);
        for (flag, value) in &self.ordered_arguments {
            command.arg(flag).arg(value);
        }
        command.arg(self.input_path.raw()).arg(self.output_path.raw());
        command
    }
}

impl Display for ExecutionRequest {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.command_line())
    }
}

#[cfg(not(windows))]
fn shell_command() -> Command {
    let mut command = Command::new(DEFAULT_SHELL);
    command.arg("-c");
    command
}

#[cfg(windows)]
fn shell_command() -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C");
    command
}

/// Replaces the extension of `input_path` with `extension`. The leading dot
/// of `extension` is optional.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use guetzli_export_core::request::output_path_for;
///
/// assert_eq!(output_path_for(Path::new("test.png"), ".jpeg"), PathBuf::from("test.jpeg"));
/// ```
pub fn output_path_for(input_path: &Path, extension: &str) -> PathBuf {
    input_path.with_extension(extension.trim_start_matches('.'))
}

/// Copies `parameters` in order and writes `quality` under `quality_flag`.
/// An existing quality entry keeps its position; a new one goes last.
pub fn ordered_arguments(
    parameters: &IndexMap<String, String>,
    quality_flag: &str,
    quality: u8,
) -> Vec<(String, String)> {
    let mut parameters = parameters.clone();
    parameters.insert(quality_flag.to_string(), quality.to_string());
    parameters.into_iter().collect()
}

/// Assembles the request for one run. Pure: nothing is read from disk.
pub fn build(
    command_path: &Path,
    spec: &CommandSpec,
    quality: u8,
    input_path: &Path,
    output_extension: &str,
) -> ExecutionRequest {
    ExecutionRequest {
        executable_path: command_path.to_path_buf(),
        ordered_arguments: ordered_arguments(&spec.parameters, &spec.quality_flag, quality),
        input_path: QuotedPath::new(input_path),
        output_path: QuotedPath::new(output_path_for(input_path, output_extension)),
        use_shell: spec.use_shell,
    }
}
