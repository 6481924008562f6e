use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Input file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Malformed input in {} at line {line}: {reason}", .path.display())]
    MalformedInput {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Missing column '{column}'{}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    MissingColumn { column: String, line: Option<u64> },

    #[error("Invalid delimiter {0:?}: must be a single byte")]
    InvalidDelimiter(String),

    #[error("Invalid output file name: {0}")]
    InvalidOutputName(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write package {}: {reason}", .path.display())]
    Package { path: PathBuf, reason: String },
}

impl DeckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeckError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn package(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DeckError::Package {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
