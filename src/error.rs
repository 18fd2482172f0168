use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    /// The registry file does not exist yet. Callers usually recover by
    /// starting from an empty registry.
    #[error("registry file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The registry file exists but cannot be read back as call descriptors.
    #[error("registry {} cannot be parsed as API calls: {reason}", .path.display())]
    MalformedRegistry { path: PathBuf, reason: String },

    #[error("invalid handler reference `{0}`: expected a path like `module::function`")]
    InvalidHandler(String),

    #[error("unknown HTTP method `{0}`")]
    InvalidMethod(String),

    #[error("invalid configuration {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::MalformedRegistry {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON serialization error: {}", err))
    }
}
