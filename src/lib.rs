//! colsift - select and extract columns from CSV files.
//!
//! A small ingestion/projection engine: a source file is loaded either
//! fully or as a bounded sample depending on its size, a requested
//! column subset is validated against the discovered schema, and the
//! projected columns are written to a new file. Blocking work can be
//! pushed onto a background worker so an interactive front-end stays
//! responsive.
//!
//! # Quick Start
//!
//! ```no_run
//! use colsift::{project, ColumnSelection, SourceDataset};
//!
//! let dataset = SourceDataset::load("data.csv").unwrap();
//! println!("{} rows, {} columns", dataset.total_rows(), dataset.schema().len());
//!
//! let selection = ColumnSelection::new(["name", "age"]);
//! let result = project(&dataset, &selection, "selected.csv").unwrap();
//! println!("wrote {} rows", result.rows_written);
//! ```
//!
//! Values are treated as text throughout: there is no type inference,
//! and the only transformation is column selection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)
)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

/// CLI module for the command-line interface
pub mod cli;
pub mod dataset;
pub mod error;
pub mod inspect;
pub mod project;
pub mod repl;
pub mod schema;
pub mod select;
pub mod task;

// Re-exports for convenience
pub use dataset::{LoadOptions, SourceDataset};
pub use error::{Error, Result};
pub use inspect::{FileSummary, LoadMode};
pub use project::{project, ProjectingReader, ProjectionResult};
pub use schema::Schema;
pub use select::{validate, ColumnSelection};
pub use task::{TaskHandle, TaskRunner};
