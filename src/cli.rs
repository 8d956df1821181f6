//! colsift CLI.
//!
//! Non-interactive command surface: project columns from a CSV file,
//! print its schema, or hand off to the interactive selector.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{CommandFactory, Parser};

use crate::{
    dataset::SourceDataset,
    project,
    repl,
    schema,
    select::ColumnSelection,
};

/// colsift - select and extract columns from CSV files
#[derive(Debug, Parser)]
#[command(name = "colsift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CSV file path
    #[arg(short, long)]
    input: PathBuf,

    /// Comma-separated list of column names to keep (e.g. "name,age,city")
    #[arg(short, long)]
    columns: Option<String>,

    /// Output CSV file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show available columns in the input file and exit
    #[arg(long)]
    show_columns: bool,

    /// Launch the interactive column selector
    #[arg(long)]
    gui: bool,

    /// Print the projection result as JSON
    #[arg(long)]
    json: bool,
}

/// Parses arguments and runs the requested operation.
///
/// Exits 0 on success and on `--show-columns`; 1 on any error. When
/// neither `--gui` nor both of `--columns`/`--output` are given, usage
/// help is printed and the process still exits 0.
#[must_use]
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = if cli.show_columns {
        cmd_show_columns(&cli.input)
    } else if cli.gui {
        repl::run(Some(&cli.input))
    } else {
        match (&cli.columns, &cli.output) {
            (Some(columns), Some(output)) => {
                cmd_filter(&cli.input, columns, output, cli.json)
            }
            _ => {
                println!("Both --columns and --output are required for filtering.");
                println!("Use --show-columns to see available columns first.");
                println!("Use --gui to launch the interactive selector.\n");
                let _ = Cli::command().print_help();
                println!();
                return ExitCode::SUCCESS;
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints the schema with 1-based indices.
fn cmd_show_columns(input: &Path) -> crate::Result<()> {
    let schema = schema::read_header(input)?;

    println!("\nAvailable columns in '{}':", input.display());
    println!("{}", "-".repeat(50));
    for (i, name) in schema.names().iter().enumerate() {
        println!("{:3}. {name}", i + 1);
    }
    println!("\nTotal columns: {}", schema.len());
    Ok(())
}

/// Loads the input, validates the selection, and writes the projection.
/// The command-line path runs synchronously; no worker is involved.
fn cmd_filter(input: &Path, columns: &str, output: &Path, json: bool) -> crate::Result<()> {
    let dataset = SourceDataset::load(input)?;
    let selection = ColumnSelection::parse(columns);
    let result = project::project(&dataset, &selection, output)?;

    if json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|e| crate::Error::io_no_path(std::io::Error::other(e)))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Input file: {} ({:.2} MB)", input.display(), mb(result.input_bytes));
    println!(
        "Output file: {} ({:.2} MB)",
        result.output_path.display(),
        mb(result.output_bytes)
    );
    println!("Rows processed: {}", result.rows_written);
    println!(
        "Columns: {} of {}",
        result.selected_columns, result.total_columns
    );
    println!("Operation completed successfully!");
    Ok(())
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
