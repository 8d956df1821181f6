//! Column catalog: the ordered schema discovered from a header row.

use std::path::Path;

use crate::error::{Error, Result};

/// Ordered sequence of column names discovered from a source's header
/// row. Immutable once established for a given file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
}

impl Schema {
    /// Builds a schema from header names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if a name occurs more than once.
    /// Duplicate header names would make name-based selection ambiguous,
    /// so they are rejected outright rather than resolved first-wins.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = std::collections::HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(Error::parse(format!(
                    "duplicate column name in header: '{name}'"
                )));
            }
        }
        Ok(Self { names })
    }

    /// The column names, in source order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a column by exact, case-sensitive name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// True if the schema contains the exact name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

/// Reads only the header row of a CSV file and returns its schema.
///
/// No data rows are parsed, so this is cheap even for files far above
/// the sample threshold and works without a prior full load.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the path does not exist,
/// [`Error::EmptyFile`] if there is no header row, and [`Error::Parse`]
/// for malformed or duplicate headers.
pub fn read_header(path: impl AsRef<Path>) -> Result<Schema> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path)
        } else {
            Error::io(e, path)
        }
    })?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader.headers()?;
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(Error::empty_file(path));
    }

    Schema::new(headers.iter())
}
