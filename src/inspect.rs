//! Source file inspection: size, load mode decision, and row counting.
//!
//! Inspection runs before any parsing so the loader knows whether the
//! file fits in memory or should be sampled.

use std::{
    fs,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::{Error, Result};

/// Files strictly larger than this are loaded in sample mode.
pub const SAMPLE_THRESHOLD_BYTES: u64 = 100 * 1024 * 1024;

/// How a source file will be brought into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LoadMode {
    /// The entire table is parsed into memory.
    Full,
    /// Only a bounded prefix is parsed; projections re-read the source.
    Sample,
}

impl LoadMode {
    /// Decides the load mode for a file of the given byte size.
    ///
    /// The threshold is a strict greater-than: a file of exactly
    /// [`SAMPLE_THRESHOLD_BYTES`] is still loaded in full.
    #[must_use]
    pub fn for_size(size_bytes: u64) -> Self {
        if size_bytes > SAMPLE_THRESHOLD_BYTES {
            Self::Sample
        } else {
            Self::Full
        }
    }
}

/// Size and load mode of a source file, determined without parsing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    /// File size in bytes.
    pub size_bytes: u64,
    /// Load mode chosen for this size.
    pub mode: LoadMode,
}

/// Inspects a source file and decides how it should be loaded.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the path does not exist, or
/// [`Error::Io`] for other metadata failures.
pub fn inspect(path: impl AsRef<Path>) -> Result<FileSummary> {
    let path = path.as_ref();
    let meta = fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path)
        } else {
            Error::io(e, path)
        }
    })?;

    let size_bytes = meta.len();
    Ok(FileSummary {
        size_bytes,
        mode: LoadMode::for_size(size_bytes),
    })
}

/// Counts the data rows of a file by scanning line boundaries, minus one
/// for the header line.
///
/// The scan is a single forward pass over a buffered reader and never
/// holds more than one line in memory, so it is safe for files far above
/// the sample threshold. A final line without a trailing newline still
/// counts.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the path does not exist, or
/// [`Error::Io`] on read failure.
pub fn count_data_rows(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path)
        } else {
            Error::io(e, path)
        }
    })?;

    let mut reader = BufReader::new(file);
    let mut lines: u64 = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::io(e, path))?;
        if read == 0 {
            break;
        }
        lines += 1;
    }

    Ok(lines.saturating_sub(1))
}
