use miette::Diagnostic;
use thiserror::Error;

/// Main error type for placer operations
#[derive(Error, Diagnostic, Debug)]
pub enum PlacerError {
    #[error("IO error: {0}")]
    #[diagnostic(code(placer::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(placer::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(placer::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(placer::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Surface error: {message}")]
    #[diagnostic(code(placer::surface))]
    Surface {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, PlacerError>;
