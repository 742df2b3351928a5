//! Error types for the repolens library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using repolens's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acquiring or analyzing repositories.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported language for the given file.
    #[error("Unsupported language for file: {path}")]
    UnsupportedLanguage { path: PathBuf },

    /// Parse error from tree-sitter.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration error. Raised before any analysis begins.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Analysis-specific error.
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Remote repository or GitHub API error.
    #[error("Remote repository error: {0}")]
    Remote(String),

    /// Report generation error.
    #[error("Report error: {0}")]
    Report(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(String),
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

impl Error {
    /// Create a new analysis error.
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new remote error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Create a new report error.
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::analysis("test error");
        assert_eq!(err.to_string(), "Analysis error: test error");

        let err = Error::config("no repositories configured");
        assert_eq!(
            err.to_string(),
            "Configuration error: no repositories configured"
        );
    }

    #[test]
    fn test_remote_error() {
        let err = Error::remote("HTTP 404");
        assert!(matches!(err, Error::Remote(_)));
        assert_eq!(err.to_string(), "Remote repository error: HTTP 404");
    }
}
