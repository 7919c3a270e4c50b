use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the configuration store and the notes directory.
pub enum StoreError {
    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    /// `config.json` could not be read or written as JSON.
    Json(#[from] serde_json::Error),

    #[error("file must have a .snt extension: {}", .0.display())]
    /// A note path without the `.snt` extension.
    InvalidExtension(PathBuf),

    #[error("invalid directory: {}", .0.display())]
    /// The notes directory is unset, `/`, or not a directory.
    InvalidDirectory(PathBuf),

    #[error("no configuration directory available")]
    /// The platform has no per-user configuration directory.
    NoConfigDir,
}
