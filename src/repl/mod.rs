//! Interactive column selector.
//!
//! A line-based interactive surface over the core: open a file, inspect
//! and preview its columns, build a selection, and save the projection.
//! Load and save run on a background worker through the session's
//! [`TaskRunner`](crate::task::TaskRunner); the control loop here only
//! parses commands and prints results.

mod commands;
mod prompt;
mod session;

use std::io::IsTerminal;
use std::path::Path;

use reedline::{Reedline, Signal};

pub use commands::{CommandParser, ReplCommand};
pub use prompt::SelectorPrompt;
pub use session::SelectorSession;

use crate::Result;

/// Runs the interactive session, optionally opening a file first.
///
/// Falls back to a plain line loop when stdin is not a terminal, so the
/// session can be driven by piped input.
///
/// # Errors
///
/// Returns an error only if the line editor cannot be initialized;
/// command failures are printed and the session continues.
pub fn run(initial: Option<&Path>) -> Result<()> {
    let mut session = SelectorSession::new();

    println!(
        "colsift {} - CSV column selector",
        env!("CARGO_PKG_VERSION")
    );
    println!("Type 'help' for commands, 'quit' to exit\n");

    if let Some(path) = initial {
        dispatch(
            &mut session,
            &format!("open {}", path.display()),
        );
    }

    if std::io::stdin().is_terminal() {
        run_interactive(&mut session)
    } else {
        run_non_interactive(&mut session);
        Ok(())
    }
}

fn run_interactive(session: &mut SelectorSession) -> Result<()> {
    session.set_spinner(true);
    let mut line_editor = create_editor()?;

    loop {
        let prompt = SelectorPrompt::new(session);
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if is_quit(trimmed) {
                    println!("Goodbye!");
                    break;
                }
                dispatch(session, trimmed);
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
            }
            Ok(Signal::CtrlD) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

/// Plain line loop for piped input and testing.
fn run_non_interactive(session: &mut SelectorSession) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_quit(trimmed) {
            break;
        }
        dispatch(session, trimmed);
    }
    println!("Goodbye!");
}

fn is_quit(line: &str) -> bool {
    matches!(
        CommandParser::parse(line),
        Ok(ReplCommand::Quit)
    )
}

fn dispatch(session: &mut SelectorSession, line: &str) {
    match CommandParser::parse(line) {
        Ok(cmd) => match session.execute(cmd) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Err(e) => eprintln!("Error: {e}"),
        },
        Err(e) => eprintln!("{e}"),
    }
}

fn create_editor() -> Result<Reedline> {
    use reedline::FileBackedHistory;

    let history_path = home_dir().join(".colsift_history");
    let history = FileBackedHistory::with_file(1000, history_path)
        .map_err(|e| crate::Error::io_no_path(std::io::Error::other(e.to_string())))?;

    Ok(Reedline::create().with_history(Box::new(history)))
}

fn home_dir() -> std::path::PathBuf {
    std::env::var("HOME")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
}
