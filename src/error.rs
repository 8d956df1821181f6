//! Error types for colsift.

use std::path::PathBuf;

/// Result type alias for colsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in colsift operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Source file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// Source file contains no parsable header row.
    #[error("CSV file is empty: {path}")]
    EmptyFile {
        /// The path of the empty file.
        path: PathBuf,
    },

    /// Malformed delimited input (inconsistent field counts,
    /// unterminated quotes, duplicate header names).
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// One or more requested columns are not present in the schema.
    /// Carries every missing name, not just the first.
    #[error("Invalid column names: {}", names.join(", "))]
    InvalidColumns {
        /// The requested names absent from the schema.
        names: Vec<String>,
    },

    /// The selection was empty.
    #[error("No columns selected")]
    NoColumnsSelected,

    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create an I/O error without path context.
    pub fn io_no_path(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }

    /// Create a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an empty-file error.
    pub fn empty_file(path: impl Into<PathBuf>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an invalid-columns error from the missing names.
    pub fn invalid_columns(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::InvalidColumns {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<csv::Error> for Error {
    /// Maps a `csv::Error` onto the colsift taxonomy: I/O failures inside
    /// the reader stay `Io`, everything else (unequal field counts,
    /// quoting, UTF-8) becomes `Parse`.
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => Self::io_no_path(io),
                other => Self::parse(format!("{other:?}")),
            }
        } else {
            Self::Parse {
                message: err.to_string(),
            }
        }
    }
}
