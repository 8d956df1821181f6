//! Source dataset loading: full in-memory tables and bounded samples.
//!
//! The loader produces a [`SourceDataset`], the working representation
//! consulted by validation and projection. Small files are parsed
//! entirely; files over the size threshold get a bounded preview prefix
//! plus an exact row count from a streaming line scan, and any later
//! projection re-reads the source.

use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthStr;

use crate::{
    error::{Error, Result},
    inspect::{self, LoadMode},
    schema::Schema,
};

/// Number of data rows parsed into memory in sample mode.
pub const SAMPLE_ROW_LIMIT: usize = 1000;

/// Number of prefix rows consulted for column display-width hints.
/// Must not exceed [`SAMPLE_ROW_LIMIT`].
pub const WIDTH_HINT_ROWS: usize = 10;

/// Minimum column display-width hint, in character cells.
const WIDTH_HINT_MIN: usize = 10;

/// Maximum column display-width hint, in character cells.
const WIDTH_HINT_MAX: usize = 25;

/// Options for loading a source file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Override the size-based load mode decision, if set.
    mode: Option<LoadMode>,
    /// Number of data rows parsed in sample mode.
    sample_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mode: None,
            sample_rows: SAMPLE_ROW_LIMIT,
        }
    }
}

impl LoadOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a load mode instead of deciding by file size.
    #[must_use]
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the number of rows parsed in sample mode.
    #[must_use]
    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = rows.max(1);
        self
    }
}

/// A loaded source file: schema, row buffer, and exact row count.
///
/// In `Full` mode the row buffer holds the complete table. In `Sample`
/// mode it holds a bounded prefix for preview and schema purposes, and
/// projection must re-read the source file.
///
/// The dataset is written only while loading and read-only afterwards;
/// it is owned by the session that opened the file and is not shared
/// across sessions.
#[derive(Debug, Clone)]
pub struct SourceDataset {
    path: PathBuf,
    size_bytes: u64,
    mode: LoadMode,
    total_rows: u64,
    schema: Schema,
    rows: Vec<Vec<String>>,
}

impl SourceDataset {
    /// Loads a source file, choosing full or sample mode by size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] for a missing path,
    /// [`Error::EmptyFile`] when there is no parsable header,
    /// [`Error::Parse`] for malformed input, and [`Error::Io`] on read
    /// failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_options(path, LoadOptions::default())
    }

    /// Loads a source file with explicit options.
    ///
    /// # Errors
    ///
    /// Same failure conditions as [`SourceDataset::load`].
    pub fn load_with_options(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let summary = inspect::inspect(path)?;
        let mode = options.mode.unwrap_or(summary.mode);

        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader.headers()?;
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(Error::empty_file(path));
        }
        let schema = Schema::new(headers.iter())?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_owned).collect());
            if mode == LoadMode::Sample && rows.len() >= options.sample_rows {
                break;
            }
        }

        let total_rows = match mode {
            LoadMode::Full => rows.len() as u64,
            LoadMode::Sample => inspect::count_data_rows(path)?,
        };

        tracing::debug!(
            path = %path.display(),
            ?mode,
            total_rows,
            buffered = rows.len(),
            columns = schema.len(),
            "loaded source dataset"
        );

        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: summary.size_bytes,
            mode,
            total_rows,
            schema,
            rows,
        })
    }

    /// Path of the source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the source file in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Load mode chosen for this dataset.
    #[must_use]
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// True if only a bounded prefix of rows is buffered.
    #[must_use]
    pub fn is_sample(&self) -> bool {
        self.mode == LoadMode::Sample
    }

    /// Exact number of data rows in the source, in both modes.
    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// The discovered schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The buffered rows: the whole table in full mode, a bounded prefix
    /// in sample mode.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Up to `n` buffered rows for preview display.
    #[must_use]
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Display-width hints per column, in character cells.
    ///
    /// Derived from the header and the first [`WIDTH_HINT_ROWS`] buffered
    /// rows only, clamped to a presentation-friendly range. These are
    /// hints for a front-end, not a contract of the data.
    #[must_use]
    pub fn column_width_hints(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .schema
            .names()
            .iter()
            .map(|name| name.width())
            .collect();

        for row in self.preview(WIDTH_HINT_ROWS) {
            for (i, value) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(value.width());
                }
            }
        }

        widths
            .into_iter()
            .map(|w| w.clamp(WIDTH_HINT_MIN, WIDTH_HINT_MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_full_load() {
        let (_dir, path) = write_temp("a,b,c\n1,2,3\n4,5,6\n");
        let dataset = SourceDataset::load(&path).unwrap();
        assert_eq!(dataset.mode(), LoadMode::Full);
        assert!(!dataset.is_sample());
        assert_eq!(dataset.total_rows(), 2);
        assert_eq!(dataset.rows().len(), 2);
        assert_eq!(dataset.schema().names(), &["a", "b", "c"]);
        assert_eq!(dataset.rows()[0], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sample_load_buffers_prefix_but_counts_all() {
        let mut contents = String::from("a,b\n");
        for i in 0..20 {
            contents.push_str(&format!("{i},{i}\n"));
        }
        let (_dir, path) = write_temp(&contents);
        let options = LoadOptions::new()
            .with_mode(LoadMode::Sample)
            .with_sample_rows(5);
        let dataset = SourceDataset::load_with_options(&path, options).unwrap();
        assert!(dataset.is_sample());
        assert_eq!(dataset.rows().len(), 5);
        assert_eq!(dataset.total_rows(), 20);
    }

    #[test]
    fn test_sample_count_matches_full_parse() {
        let (_dir, path) = write_temp("a,b\n1,2\n3,4\n5,6\n");
        let full = SourceDataset::load(&path).unwrap();
        let sample = SourceDataset::load_with_options(
            &path,
            LoadOptions::new().with_mode(LoadMode::Sample).with_sample_rows(1),
        )
        .unwrap();
        assert_eq!(sample.total_rows(), full.total_rows());
    }

    #[test]
    fn test_empty_file() {
        let (_dir, path) = write_temp("");
        let err = SourceDataset::load(&path).unwrap_err();
        assert!(matches!(err, Error::EmptyFile { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = SourceDataset::load("/no/such/file.csv").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_inconsistent_field_count_is_parse_error() {
        let (_dir, path) = write_temp("a,b\n1,2\n3\n");
        let err = SourceDataset::load(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_quoted_fields() {
        let (_dir, path) = write_temp("a,b\n\"hello, world\",2\n");
        let dataset = SourceDataset::load(&path).unwrap();
        assert_eq!(dataset.rows()[0][0], "hello, world");
    }

    #[test]
    fn test_preview_is_bounded() {
        let (_dir, path) = write_temp("a\n1\n2\n3\n");
        let dataset = SourceDataset::load(&path).unwrap();
        assert_eq!(dataset.preview(2).len(), 2);
        assert_eq!(dataset.preview(100).len(), 3);
    }

    #[test]
    fn test_column_width_hints_clamped() {
        let (_dir, path) = write_temp(
            "short,a_rather_long_column_header_name\nx,this value is much longer than the cap allows\n",
        );
        let dataset = SourceDataset::load(&path).unwrap();
        let hints = dataset.column_width_hints();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0], 10);
        assert_eq!(hints[1], 25);
    }

    #[test]
    fn test_schema_stable_across_header_read_and_full_load() {
        let (_dir, path) = write_temp("x,y,z\n1,2,3\n");
        let before = crate::schema::read_header(&path).unwrap();
        let dataset = SourceDataset::load(&path).unwrap();
        assert_eq!(before, *dataset.schema());
    }
}
