use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File Not Found\n{}\n{}\nDownload the tool from: {}", .directory, .pattern, .download_hint)]
    NotFound {
        directory: String,
        pattern: String,
        download_hint: String,
    },

    #[error("The image has no file on disk. Save the image before exporting.")]
    MissingFilePath,

    #[error("The image `{}` has unsaved changes. Save the image before exporting.", .0)]
    UnsavedChanges(String),

    #[error("UnSupported File Type\n{}", .0)]
    UnsupportedFileType(String),

    #[error("The sub process exited with code {}:\n{}", .exit_code, .output)]
    Execution { exit_code: i32, output: String },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Invalid configuration in `{}`: {}", .path, .reason)]
    InvalidConfig { path: String, reason: String },

    #[error("Invalid executable search pattern `{}`: {}", .0, .1)]
    Pattern(String, glob::PatternError),

    #[error("Could not read image dimensions of `{}`: {}", .0, .1)]
    ImageDimensions(String, image::ImageError),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn not_found(directory: String, pattern: String, download_hint: String) -> Self {
        Self::NotFound {
            directory,
            pattern,
            download_hint,
        }
    }

    pub fn execution(exit_code: i32, output: String) -> Self {
        Self::Execution { exit_code, output }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn invalid_config(path: String, reason: String) -> Self {
        Self::InvalidConfig { path, reason }
    }

    /// True for the errors raised before any process is launched because the
    /// image itself cannot be exported.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingFilePath | Self::UnsavedChanges(_) | Self::UnsupportedFileType(_)
        )
    }

    /// Diagnostic text captured from the child process, if this error carries any.
    #[must_use]
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::Execution { output, .. } => Some(output),
            _ => None,
        }
    }
}
