//! Command grammar for the interactive session.
//!
//! Parses user input into structured commands. The grammar mirrors the
//! batch CLI where it can: `open` is `--input`, `columns` is
//! `--show-columns`, `save` is `--columns`/`--output`.

use crate::{Error, Result};

/// Commands accepted by the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Open a source CSV file.
    Open {
        /// Path to the source file.
        path: String,
    },

    /// List schema columns with selection markers.
    Columns,

    /// Show file information for the loaded source.
    Info,

    /// Show the first rows of the loaded buffer.
    Preview {
        /// Number of rows to display.
        n: usize,
    },

    /// Add columns to the selection.
    Select {
        /// Column names to add.
        names: Vec<String>,
    },

    /// Remove columns from the selection.
    Deselect {
        /// Column names to remove.
        names: Vec<String>,
    },

    /// Select every column.
    All,

    /// Clear the selection.
    Clear,

    /// Write the selected columns to a new file.
    Save {
        /// Destination path.
        path: String,
    },

    /// Show help text.
    Help,

    /// Exit the session.
    Quit,
}

/// Default number of preview rows.
const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Parser for session commands.
pub struct CommandParser;

impl CommandParser {
    /// Parses one input line into a command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for unknown commands or missing
    /// arguments.
    pub fn parse(line: &str) -> Result<ReplCommand> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Err(Error::parse("empty command"));
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "open" => match args.as_slice() {
                [path] => Ok(ReplCommand::Open {
                    path: (*path).to_owned(),
                }),
                _ => Err(Error::parse("usage: open <path>")),
            },
            "columns" | "cols" => Ok(ReplCommand::Columns),
            "info" => Ok(ReplCommand::Info),
            "preview" | "head" => {
                let n = match args.as_slice() {
                    [] => DEFAULT_PREVIEW_ROWS,
                    [n] => n
                        .parse()
                        .map_err(|_| Error::parse(format!("not a row count: '{n}'")))?,
                    _ => return Err(Error::parse("usage: preview [rows]")),
                };
                Ok(ReplCommand::Preview { n })
            }
            "select" => {
                let names = parse_names(&args);
                if names.is_empty() {
                    return Err(Error::parse("usage: select <name> [name ...]"));
                }
                Ok(ReplCommand::Select { names })
            }
            "deselect" => {
                let names = parse_names(&args);
                if names.is_empty() {
                    return Err(Error::parse("usage: deselect <name> [name ...]"));
                }
                Ok(ReplCommand::Deselect { names })
            }
            "all" => Ok(ReplCommand::All),
            "none" | "clear" => Ok(ReplCommand::Clear),
            "save" => match args.as_slice() {
                [path] => Ok(ReplCommand::Save {
                    path: (*path).to_owned(),
                }),
                _ => Err(Error::parse("usage: save <path>")),
            },
            "help" | "?" => Ok(ReplCommand::Help),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            other => Err(Error::parse(format!(
                "unknown command: '{other}' (try 'help')"
            ))),
        }
    }
}

/// Column name arguments may be space- or comma-separated.
fn parse_names(args: &[&str]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        let cmd = CommandParser::parse("open data.csv").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Open {
                path: "data.csv".to_owned()
            }
        );
    }

    #[test]
    fn test_parse_open_missing_path() {
        assert!(CommandParser::parse("open").is_err());
    }

    #[test]
    fn test_parse_columns_alias() {
        assert_eq!(CommandParser::parse("cols").unwrap(), ReplCommand::Columns);
    }

    #[test]
    fn test_parse_preview_default() {
        assert_eq!(
            CommandParser::parse("preview").unwrap(),
            ReplCommand::Preview { n: 10 }
        );
    }

    #[test]
    fn test_parse_preview_count() {
        assert_eq!(
            CommandParser::parse("head 25").unwrap(),
            ReplCommand::Preview { n: 25 }
        );
    }

    #[test]
    fn test_parse_preview_bad_count() {
        assert!(CommandParser::parse("preview lots").is_err());
    }

    #[test]
    fn test_parse_select_space_separated() {
        let cmd = CommandParser::parse("select name age").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Select {
                names: vec!["name".to_owned(), "age".to_owned()]
            }
        );
    }

    #[test]
    fn test_parse_select_comma_separated() {
        let cmd = CommandParser::parse("select name,age, city").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Select {
                names: vec!["name".to_owned(), "age".to_owned(), "city".to_owned()]
            }
        );
    }

    #[test]
    fn test_parse_select_requires_names() {
        assert!(CommandParser::parse("select").is_err());
    }

    #[test]
    fn test_parse_all_and_clear() {
        assert_eq!(CommandParser::parse("all").unwrap(), ReplCommand::All);
        assert_eq!(CommandParser::parse("none").unwrap(), ReplCommand::Clear);
        assert_eq!(CommandParser::parse("clear").unwrap(), ReplCommand::Clear);
    }

    #[test]
    fn test_parse_save() {
        let cmd = CommandParser::parse("save out.csv").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Save {
                path: "out.csv".to_owned()
            }
        );
    }

    #[test]
    fn test_parse_quit_aliases() {
        for line in ["quit", "exit", "q"] {
            assert_eq!(CommandParser::parse(line).unwrap(), ReplCommand::Quit);
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = CommandParser::parse("frobnicate").unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }
}
