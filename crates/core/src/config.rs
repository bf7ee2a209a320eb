//! Configuration loading for guetzli-export.
//!
//! The configuration document is a YAML file describing how to find the
//! compression tool, which parameters to pass it, which image files it
//! accepts and how fast it is expected to run. It is read once at startup
//! into a [`Config`] that the other components borrow.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default path for the configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.guetzli-export/config.yml";

/// Default shell to use when the command is run through a shell
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Flag the quality override is written to unless configured otherwise
pub const DEFAULT_QUALITY_FLAG: &str = "--quality";

/// Expected tool runtime per megapixel of input, in seconds
pub const DEFAULT_SECONDS_PER_MEGAPIXEL: u32 = 60;

/// Interval between two progress ticks, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

fn default_quality_flag() -> String {
    DEFAULT_QUALITY_FLAG.to_string()
}

fn default_seconds_per_megapixel() -> u32 {
    DEFAULT_SECONDS_PER_MEGAPIXEL
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Where the compression tool lives and how it is invoked.
#[derive(Deserialize, Debug, Clone)]
pub struct CommandSpec {
    /// Glob pattern matched against file names in the tool directory.
    pub search_pattern: String,
    /// Candidates of this size or smaller are placeholders and never selected.
    pub size_floor_bytes: u64,
    #[serde(default)]
    pub download_hint: String,
    /// File name endings the tool accepts as input, matched case-sensitively.
    pub suffixes: Vec<String>,
    #[serde(default, rename = "new_shell")]
    pub use_shell: bool,
    #[serde(default = "default_quality_flag")]
    pub quality_flag: String,
    #[serde(default)]
    pub parameters: IndexMap<String, String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProgressSettings {
    #[serde(default = "default_seconds_per_megapixel")]
    pub seconds_per_megapixel: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            seconds_per_megapixel: DEFAULT_SECONDS_PER_MEGAPIXEL,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ProgressSettings {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub command: CommandSpec,
    #[serde(default)]
    pub progress: ProgressSettings,
}

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use guetzli_export_core::config::get_config_path;
///
/// let custom_path = get_config_path(&Some("/path/to/config.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/config.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

/// Resolves the directory searched for the tool executable.
///
/// An explicit directory wins; otherwise the tool is expected next to the
/// configuration file.
pub fn search_directory(config_path: &str, directory_arg: &Option<String>) -> PathBuf {
    if let Some(directory) = directory_arg {
        return PathBuf::from(shellexpand::tilde(directory).to_string());
    }

    match Path::new(config_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn validate_config(path: &str, config: &Config) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(Error::invalid_config(path.to_string(), reason.to_string()))
    };

    if config.command.suffixes.is_empty() {
        return invalid("`command.suffixes` must list at least one file suffix");
    }

    if config.command.quality_flag.is_empty() {
        return invalid("`command.quality_flag` may not be empty");
    }

    if config.progress.seconds_per_megapixel == 0 {
        return invalid("`progress.seconds_per_megapixel` must be positive");
    }

    if config.progress.poll_interval_ms == 0 {
        return invalid("`progress.poll_interval_ms` must be positive");
    }

    glob::Pattern::new(&config.command.search_pattern)
        .map_err(|e| Error::Pattern(config.command.search_pattern.clone(), e))?;

    Ok(())
}

/// Parses and validates a configuration document.
///
/// `path` is only used for error messages.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a value is out of range.
pub fn parse_config(path: &str, contents: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            path.to_string(),
            e,
        )
    })?;

    validate_config(path, &config)?;

    Ok(config)
}

/// Loads and validates the configuration file.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be read
/// - The YAML is malformed or doesn't match the expected structure
/// - The suffix list is empty or the search pattern is not a valid glob
/// - A progress setting is zero
///
/// # Examples
///
/// ```no_run
/// use guetzli_export_core::config::load_config;
///
/// let config = load_config("/opt/guetzli-export/config.yml")?;
/// println!("Looking for `{}`", config.command.search_pattern);
/// # Ok::<(), guetzli_export_core::error::Error>(())
/// ```
pub fn load_config(path: &str) -> Result<Config> {
    debug!("Loading config from `{path}`");

    let contents = fs::read_to_string(path)
        .map_err(|e| Error::io_error("config".to_string(), path.to_string(), e))?;

    parse_config(path, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 10000
  suffixes: [".png", ".jpg"]
"#;

    #[test]
    fn test_get_config_path_with_custom_path() {
        let custom_path = Some("/custom/path/config.yml".to_string());
        assert_eq!(get_config_path(&custom_path), "/custom/path/config.yml");
    }

    #[test]
    fn test_get_config_path_with_none() {
        let result = get_config_path(&None);
        assert!(result.ends_with("config.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_search_directory_defaults_to_config_parent() {
        let directory = search_directory("/opt/plugins/config.yml", &None);
        assert_eq!(directory, PathBuf::from("/opt/plugins"));
    }

    #[test]
    fn test_search_directory_bare_file_name() {
        assert_eq!(search_directory("config.yml", &None), PathBuf::from("."));
    }

    #[test]
    fn test_search_directory_override() {
        let directory = search_directory("/opt/plugins/config.yml", &Some("/tools".to_string()));
        assert_eq!(directory, PathBuf::from("/tools"));
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = parse_config("inline", MINIMAL).unwrap();
        assert_eq!(config.command.search_pattern, "guetzli*");
        assert_eq!(config.command.size_floor_bytes, 10000);
        assert!(!config.command.use_shell);
        assert_eq!(config.command.quality_flag, DEFAULT_QUALITY_FLAG);
        assert!(config.command.parameters.is_empty());
        assert_eq!(config.progress.seconds_per_megapixel, 60);
        assert_eq!(config.progress.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_parameters_keep_document_order() {
        let yaml = r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 10
  suffixes: [".png"]
  new_shell: true
  parameters:
    "--zeta": "1"
    "--alpha": "2"
    "--memlimit": "6000"
"#;
        let config = parse_config("inline", yaml).unwrap();
        let keys: Vec<&String> = config.command.parameters.keys().collect();
        assert_eq!(keys, vec!["--zeta", "--alpha", "--memlimit"]);
        assert!(config.command.use_shell);
    }

    #[test]
    fn test_empty_suffixes_rejected() {
        let yaml = r#"
command:
  search_pattern: "guetzli*"
  size_floor_bytes: 10
  suffixes: []
"#;
        let result = parse_config("inline", yaml);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_throughput_rejected() {
        let yaml = format!("{MINIMAL}progress:\n  seconds_per_megapixel: 0\n");
        let result = parse_config("inline", &yaml);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let yaml = r#"
command:
  search_pattern: "guetzli[*"
  size_floor_bytes: 10
  suffixes: [".png"]
"#;
        let result = parse_config("inline", yaml);
        assert!(matches!(result, Err(Error::Pattern(_, _))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{MINIMAL}").unwrap();
        let config = load_config(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.command.suffixes, vec![".png", ".jpg"]);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config("/this/path/does/not/exist.yml");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "command: [").unwrap();
        let result = load_config(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }
}
