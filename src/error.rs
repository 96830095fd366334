/// Error types for template operations.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Error types for template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Source file does not exist
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// Copying the source into the scratch directory failed
    #[error("Cannot copy source into scratch directory: {0}")]
    ScratchCopy(#[source] std::io::Error),

    /// The package could not be opened as a ZIP archive, or a required
    /// entry is missing
    #[error("Unable to unpack package: {0}")]
    Unpack(String),

    /// Moving the built package to its destination failed
    #[error("Unable to save file to {path}: {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configured scratch directory does not exist
    #[error("Scratch directory not found: {0}")]
    ScratchDirInvalid(String),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
