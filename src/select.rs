//! Column selection and validation against a discovered schema.

use crate::{
    error::{Error, Result},
    schema::Schema,
};

/// A requested subset of columns, in the order the caller gave them.
///
/// The order here is the caller's, not the output order: projection
/// always writes columns in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    names: Vec<String>,
}

impl ColumnSelection {
    /// Creates a selection from column names, preserving insertion order.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a comma-separated list, trimming whitespace around names
    /// and dropping empty entries.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        )
    }

    /// The requested names, in caller order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of requested columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True if the selection contains the exact name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Validates a selection against a schema.
///
/// Runs synchronously before any I/O-heavy work. Matching is exact and
/// case-sensitive; no fuzzy matching.
///
/// # Errors
///
/// Returns [`Error::NoColumnsSelected`] for an empty selection, or
/// [`Error::InvalidColumns`] listing every requested name absent from
/// the schema. On success the selection is returned unchanged.
pub fn validate<'a>(selection: &'a ColumnSelection, schema: &Schema) -> Result<&'a ColumnSelection> {
    if selection.is_empty() {
        return Err(Error::NoColumnsSelected);
    }

    let missing: Vec<String> = selection
        .names()
        .iter()
        .filter(|name| !schema.contains(name))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(selection)
    } else {
        Err(Error::InvalidColumns { names: missing })
    }
}
