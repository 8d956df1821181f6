//! Column projection: writing a subset of columns to a new file.
//!
//! Full-mode datasets are projected from the in-memory buffer; sample
//! datasets are projected by a fresh streaming re-read of the source
//! restricted to the selected columns. The destination is written
//! through a same-directory temp file and atomically renamed, so a
//! failed save never leaves a partial output file.

use std::path::{Path, PathBuf};

use crate::{
    dataset::SourceDataset,
    error::{Error, Result},
    select::{self, ColumnSelection},
};

/// Summary of a completed projection. Produced once per successful
/// projection; immutable.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectionResult {
    /// Number of columns written.
    pub selected_columns: usize,
    /// Number of columns in the source schema.
    pub total_columns: usize,
    /// Number of data rows written.
    pub rows_written: u64,
    /// Source file size in bytes.
    pub input_bytes: u64,
    /// Destination file size in bytes.
    pub output_bytes: u64,
    /// Destination path.
    pub output_path: PathBuf,
}

/// Streaming reader that yields only the selected fields of each row,
/// in schema order. Unselected fields are never copied out of the
/// reader's reused record buffer.
pub struct ProjectingReader {
    reader: csv::Reader<std::fs::File>,
    record: csv::StringRecord,
    indices: Vec<usize>,
}

impl ProjectingReader {
    /// Opens a source file for a projecting read over the given column
    /// positions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] or [`Error::Io`] if the source
    /// cannot be opened.
    pub fn open(path: impl AsRef<Path>, indices: Vec<usize>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path)
            } else {
                Error::io(e, path)
            }
        })?;
        let reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
        Ok(Self {
            reader,
            record: csv::StringRecord::new(),
            indices,
        })
    }

    /// Reads the next row into `out`, keeping only the selected fields.
    /// Fields missing from a row are yielded as empty strings.
    ///
    /// Returns `false` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed rows and [`Error::Io`] on
    /// read failure.
    pub fn read_row(&mut self, out: &mut Vec<String>) -> Result<bool> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(false);
        }
        out.clear();
        out.extend(
            self.indices
                .iter()
                .map(|&i| self.record.get(i).unwrap_or("").to_owned()),
        );
        Ok(true)
    }
}

/// Projects the selected columns of a dataset to `output`.
///
/// The selection is validated against the dataset's schema first, so no
/// I/O-heavy work starts and no destination file is created for an
/// invalid or empty selection. Output column order follows the order
/// columns appear in the source schema, not the order of the selection.
///
/// # Errors
///
/// Returns [`Error::NoColumnsSelected`] or [`Error::InvalidColumns`] on
/// validation failure, [`Error::Parse`] if a sample-mode re-read hits
/// malformed input, and [`Error::Io`] on read or write failure. On any
/// failure the destination is absent, never partially written.
pub fn project(
    dataset: &SourceDataset,
    selection: &ColumnSelection,
    output: impl AsRef<Path>,
) -> Result<ProjectionResult> {
    let output = output.as_ref();
    let selection = select::validate(selection, dataset.schema())?;

    // Output order follows the schema, not the selection.
    let indices: Vec<usize> = dataset
        .schema()
        .names()
        .iter()
        .enumerate()
        .filter(|(_, name)| selection.contains(name))
        .map(|(i, _)| i)
        .collect();
    let header: Vec<&str> = indices
        .iter()
        .map(|&i| dataset.schema().names()[i].as_str())
        .collect();

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(e, dir))?;

    let rows_written = {
        let mut writer = csv::Writer::from_writer(temp.as_file_mut());
        writer.write_record(&header)?;

        let mut rows_written: u64 = 0;
        if dataset.is_sample() {
            let mut reader = ProjectingReader::open(dataset.path(), indices.clone())?;
            let mut row = Vec::new();
            while reader.read_row(&mut row)? {
                writer.write_record(&row)?;
                rows_written += 1;
            }
        } else {
            for row in dataset.rows() {
                writer.write_record(
                    indices
                        .iter()
                        .map(|&i| row.get(i).map(String::as_str).unwrap_or("")),
                )?;
                rows_written += 1;
            }
        }

        writer.flush().map_err(Error::io_no_path)?;
        rows_written
    };

    temp.persist(output).map_err(|e| Error::io(e.error, output))?;
    let output_bytes = std::fs::metadata(output)
        .map_err(|e| Error::io(e, output))?
        .len();

    let result = ProjectionResult {
        selected_columns: indices.len(),
        total_columns: dataset.schema().len(),
        rows_written,
        input_bytes: dataset.size_bytes(),
        output_bytes,
        output_path: output.to_path_buf(),
    };

    tracing::info!(
        output = %output.display(),
        rows = rows_written,
        columns = indices.len(),
        "projection written"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{
        dataset::LoadOptions,
        inspect::LoadMode,
    };

    fn write_temp(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("input.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_projection_follows_schema_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b,c\n1,2,3\n4,5,6\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load(&input).unwrap();
        let selection = ColumnSelection::new(["c", "a"]);
        let result = project(&dataset, &selection, &output).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "a,c\n1,3\n4,6\n");
        assert_eq!(result.rows_written, 2);
        assert_eq!(result.selected_columns, 2);
        assert_eq!(result.total_columns, 3);
    }

    #[test]
    fn test_sample_mode_projects_all_rows_by_rereading() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = String::from("x,y\n");
        for i in 0..50 {
            contents.push_str(&format!("{i},{}\n", i * 2));
        }
        let input = write_temp(&dir, &contents);
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load_with_options(
            &input,
            LoadOptions::new().with_mode(LoadMode::Sample).with_sample_rows(3),
        )
        .unwrap();
        assert_eq!(dataset.rows().len(), 3);

        let selection = ColumnSelection::new(["y"]);
        let result = project(&dataset, &selection, &output).unwrap();
        assert_eq!(result.rows_written, 50);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("y\n0\n2\n4\n"));
    }

    #[test]
    fn test_full_schema_projection_preserves_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b\n1,2\n3,4\n5,6\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load(&input).unwrap();
        let selection = ColumnSelection::new(dataset.schema().names().to_vec());
        let result = project(&dataset, &selection, &output).unwrap();
        assert_eq!(result.rows_written, dataset.total_rows());
    }

    #[test]
    fn test_invalid_selection_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b\n1,2\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load(&input).unwrap();
        let selection = ColumnSelection::new(["z"]);
        let err = project(&dataset, &selection, &output).unwrap_err();
        match err {
            Error::InvalidColumns { names } => assert_eq!(names, vec!["z"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_selection_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b\n1,2\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load(&input).unwrap();
        let selection = ColumnSelection::new(Vec::<String>::new());
        let err = project(&dataset, &selection, &output).unwrap_err();
        assert!(matches!(err, Error::NoColumnsSelected));
        assert!(!output.exists());
    }

    #[test]
    fn test_failed_reread_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // Sample load stops before the malformed third row; the
        // projecting re-read hits it and must fail cleanly.
        let input = write_temp(&dir, "a,b\n1,2\n3\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load_with_options(
            &input,
            LoadOptions::new().with_mode(LoadMode::Sample).with_sample_rows(1),
        )
        .unwrap();
        let selection = ColumnSelection::new(["a"]);
        let err = project(&dataset, &selection, &output).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(!output.exists());

        // The temp file must be gone too: only the input remains.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_header_only_source_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load(&input).unwrap();
        let selection = ColumnSelection::new(["b"]);
        let result = project(&dataset, &selection, &output).unwrap();
        assert_eq!(result.rows_written, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "b\n");
    }

    #[test]
    fn test_quoted_values_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b\n\"x,y\",2\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load(&input).unwrap();
        let selection = ColumnSelection::new(["a"]);
        project(&dataset, &selection, &output).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "a\n\"x,y\"\n");
    }

    #[test]
    fn test_result_reports_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b\n1,2\n");
        let output = dir.path().join("out.csv");

        let dataset = SourceDataset::load(&input).unwrap();
        let selection = ColumnSelection::new(["a"]);
        let result = project(&dataset, &selection, &output).unwrap();
        assert_eq!(result.input_bytes, 8);
        assert!(result.output_bytes > 0);
        assert_eq!(result.output_path, output);
    }

    #[test]
    fn test_projecting_reader_yields_selected_fields() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_temp(&dir, "a,b,c\n1,2,3\n4,5,6\n");

        let mut reader = ProjectingReader::open(&input, vec![0, 2]).unwrap();
        let mut row = Vec::new();
        assert!(reader.read_row(&mut row).unwrap());
        assert_eq!(row, vec!["1", "3"]);
        assert!(reader.read_row(&mut row).unwrap());
        assert_eq!(row, vec!["4", "6"]);
        assert!(!reader.read_row(&mut row).unwrap());
    }
}
