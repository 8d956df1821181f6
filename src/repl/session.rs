//! Interactive session state.
//!
//! Holds the open dataset and the working column selection, and executes
//! parsed commands against the core. Command execution returns printable
//! text so the session can be tested without a terminal. Load and save
//! run on a [`TaskRunner`] worker; the session's own loop polls the
//! single-slot hand-off and drives the busy indicator while it waits.

use std::{
    fmt::Write as _,
    io::Write as _,
    path::PathBuf,
    sync::Arc,
    thread,
    time::Duration,
};

use unicode_width::UnicodeWidthStr;

use crate::{
    dataset::SourceDataset,
    error::{Error, Result},
    project::{self, ProjectionResult},
    select::{self, ColumnSelection},
    task::TaskRunner,
};

use super::commands::ReplCommand;

/// Poll interval while a worker operation is in flight.
const POLL_INTERVAL: Duration = Duration::from_millis(40);

/// Stateful interactive session over one open source file.
///
/// The dataset is owned by this session; opening a new file discards
/// the previous one. Load and save never run on the caller's thread.
#[derive(Debug)]
pub struct SelectorSession {
    dataset: Option<Arc<SourceDataset>>,
    selected: Vec<String>,
    runner: TaskRunner,
    spinner: bool,
}

impl Default for SelectorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorSession {
    /// Creates an empty session with the busy indicator disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dataset: None,
            selected: Vec::new(),
            runner: TaskRunner::new(),
            spinner: false,
        }
    }

    /// Enables or disables the terminal busy indicator.
    pub fn set_spinner(&mut self, on: bool) {
        self.spinner = on;
    }

    /// The currently open dataset, if any.
    #[must_use]
    pub fn dataset(&self) -> Option<&SourceDataset> {
        self.dataset.as_deref()
    }

    /// The working selection, in the order columns were selected.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Executes one command and returns its printable output.
    ///
    /// # Errors
    ///
    /// Returns core errors (missing file, parse failure, invalid
    /// selection, I/O) and session misuse such as commands that need an
    /// open file.
    pub fn execute(&mut self, cmd: ReplCommand) -> Result<String> {
        match cmd {
            ReplCommand::Open { path } => self.cmd_open(path),
            ReplCommand::Columns => self.cmd_columns(),
            ReplCommand::Info => Ok(self.info_text(self.open_dataset()?)),
            ReplCommand::Preview { n } => self.cmd_preview(n),
            ReplCommand::Select { names } => self.cmd_select(&names),
            ReplCommand::Deselect { names } => self.cmd_deselect(&names),
            ReplCommand::All => self.cmd_all(),
            ReplCommand::Clear => self.cmd_clear(),
            ReplCommand::Save { path } => self.cmd_save(path),
            ReplCommand::Help => Ok(help_text()),
            ReplCommand::Quit => Ok(String::new()),
        }
    }

    fn open_dataset(&self) -> Result<&SourceDataset> {
        self.dataset
            .as_deref()
            .ok_or_else(|| Error::parse("no file open (use 'open <path>')"))
    }

    /// Runs a blocking operation on the worker, polling the single-slot
    /// hand-off and ticking the busy indicator until the result lands.
    fn run_on_worker<T: Send + 'static>(
        &self,
        op: impl FnOnce() -> Result<T> + Send + 'static,
    ) -> Result<T> {
        let mut handle = self.runner.try_spawn(op).ok_or_else(|| {
            Error::io_no_path(std::io::Error::other("an operation is already in flight"))
        })?;

        loop {
            if let Some(result) = handle.try_poll() {
                if self.spinner {
                    eprintln!();
                }
                return result;
            }
            if self.spinner {
                eprint!(".");
                let _ = std::io::stderr().flush();
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn cmd_open(&mut self, path: String) -> Result<String> {
        let load_path = PathBuf::from(&path);
        let dataset = self.run_on_worker(move || SourceDataset::load(&load_path))?;

        let dataset = Arc::new(dataset);
        let info = self.info_text(&dataset);
        self.dataset = Some(dataset);
        self.selected.clear();
        Ok(info)
    }

    fn info_text(&self, dataset: &SourceDataset) -> String {
        let name = dataset
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dataset.path().display().to_string());
        let size_mb = mb(dataset.size_bytes());

        if dataset.is_sample() {
            format!(
                "File: {name} ({size_mb:.1}MB)\nTotal rows: {}\nLoaded sample: {} rows",
                thousands(dataset.total_rows()),
                thousands(dataset.rows().len() as u64),
            )
        } else {
            format!(
                "File: {name} ({size_mb:.1}MB)\nRows: {}\nColumns: {}",
                thousands(dataset.total_rows()),
                dataset.schema().len(),
            )
        }
    }

    fn cmd_columns(&self) -> Result<String> {
        let dataset = self.open_dataset()?;
        let mut out = String::new();
        for (i, name) in dataset.schema().names().iter().enumerate() {
            let marker = if self.selected.iter().any(|s| s == name) {
                'x'
            } else {
                ' '
            };
            let _ = writeln!(out, "{:3}. [{marker}] {name}", i + 1);
        }
        let _ = write!(
            out,
            "{} of {} selected",
            self.selected.len(),
            dataset.schema().len()
        );
        Ok(out)
    }

    fn cmd_preview(&self, n: usize) -> Result<String> {
        let dataset = self.open_dataset()?;
        let widths = dataset.column_width_hints();

        let mut out = String::new();
        let header: Vec<String> = dataset
            .schema()
            .names()
            .iter()
            .zip(&widths)
            .map(|(name, &w)| fit(name, w))
            .collect();
        let _ = writeln!(out, "{}", header.join("  "));

        for row in dataset.preview(n) {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(value, &w)| fit(value, w))
                .collect();
            let _ = writeln!(out, "{}", cells.join("  "));
        }
        let shown = dataset.preview(n).len();
        let _ = write!(
            out,
            "({shown} of {} rows shown)",
            thousands(dataset.total_rows())
        );
        Ok(out)
    }

    fn cmd_select(&mut self, names: &[String]) -> Result<String> {
        let dataset = self.open_dataset()?;
        let requested = ColumnSelection::new(names.to_vec());
        select::validate(&requested, dataset.schema())?;

        let total = dataset.schema().len();
        for name in names {
            if !self.selected.iter().any(|s| s == name) {
                self.selected.push(name.clone());
            }
        }
        Ok(format!("{} of {total} columns selected", self.selected.len()))
    }

    fn cmd_deselect(&mut self, names: &[String]) -> Result<String> {
        let dataset = self.open_dataset()?;
        let requested = ColumnSelection::new(names.to_vec());
        select::validate(&requested, dataset.schema())?;

        let total = dataset.schema().len();
        self.selected.retain(|s| !names.iter().any(|n| n == s));
        Ok(format!("{} of {total} columns selected", self.selected.len()))
    }

    fn cmd_all(&mut self) -> Result<String> {
        let names = self.open_dataset()?.schema().names().to_vec();
        self.selected = names;
        Ok(format!("all {} columns selected", self.selected.len()))
    }

    fn cmd_clear(&mut self) -> Result<String> {
        self.open_dataset()?;
        self.selected.clear();
        Ok("selection cleared".to_owned())
    }

    fn cmd_save(&mut self, path: String) -> Result<String> {
        let dataset = Arc::clone(
            self.dataset
                .as_ref()
                .ok_or_else(|| Error::parse("no file open (use 'open <path>')"))?,
        );

        // Validation runs here, before any worker is spawned, so an
        // empty or invalid selection surfaces immediately.
        let selection = ColumnSelection::new(self.selected.clone());
        select::validate(&selection, dataset.schema())?;

        let output = PathBuf::from(&path);
        let result = self
            .run_on_worker(move || project::project(dataset.as_ref(), &selection, &output))?;
        Ok(save_summary(&result))
    }
}

fn save_summary(result: &ProjectionResult) -> String {
    let name = result
        .output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| result.output_path.display().to_string());
    format!(
        "File saved as: {name}\nSize: {:.2}MB\nColumns: {} of {}\nRows: {}",
        mb(result.output_bytes),
        result.selected_columns,
        result.total_columns,
        thousands(result.rows_written),
    )
}

fn help_text() -> String {
    [
        "Commands:",
        "  open <path>           open a CSV file",
        "  info                  show file information",
        "  columns               list columns with selection markers",
        "  preview [rows]        show the first rows (default 10)",
        "  select <names>        add columns to the selection",
        "  deselect <names>      remove columns from the selection",
        "  all                   select every column",
        "  none                  clear the selection",
        "  save <path>           write the selected columns to a new file",
        "  quit                  exit",
    ]
    .join("\n")
}

/// Pads or truncates a value to a display width in character cells.
fn fit(value: &str, width: usize) -> String {
    if value.width() <= width {
        let pad = width - value.width();
        let mut out = String::with_capacity(value.len() + pad);
        out.push_str(value);
        out.extend(std::iter::repeat(' ').take(pad));
        return out;
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in value.chars() {
        let w = ch.to_string().width();
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    while out.width() < width {
        out.push(' ');
    }
    out
}

/// Formats an integer with thousands separators, e.g. `2,000,000`.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
