use std::path::{Path, PathBuf};

pub type GifloopResult<T> = Result<T, GifloopError>;

#[derive(thiserror::Error, Debug)]
pub enum GifloopError {
    #[error("no input files given")]
    NoInputFiles,

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("unsupported format for '{}': {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("failed to write output '{}': {reason}", path.display())]
    WriteFailure { path: PathBuf, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifloopError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound(path.into())
    }

    pub fn unsupported(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn write_failure(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::WriteFailure {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}
