//! Session prompt.
//!
//! Shows the open file and selection count so the user always knows
//! what a `save` would act on:
//!
//! ```text
//! colsift > open data.csv
//! colsift [data.csv: 1,024 rows, 0/5] > select name
//! colsift [data.csv: 1,024 rows, 1/5] >
//! ```

use std::borrow::Cow;
use std::fmt::Write;

use reedline::Prompt;

use super::session::SelectorSession;

/// Prompt reflecting the session state at the time it was rendered.
pub struct SelectorPrompt {
    rendered: String,
}

impl SelectorPrompt {
    /// Renders a prompt from the current session state.
    #[must_use]
    pub fn new(session: &SelectorSession) -> Self {
        Self {
            rendered: Self::render(session),
        }
    }

    /// Plain-text prompt string for the given session state.
    #[must_use]
    pub fn render(session: &SelectorSession) -> String {
        let mut prompt = String::from("colsift");

        if let Some(dataset) = session.dataset() {
            let name = dataset
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dataset.path().display().to_string());
            let _ = write!(
                prompt,
                " [{name}: {} rows, {}/{}]",
                dataset.total_rows(),
                session.selected().len(),
                dataset.schema().len(),
            );
        }

        prompt.push_str(" > ");
        prompt
    }
}

impl Prompt for SelectorPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.rendered)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("(search) ")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::repl::commands::{CommandParser, ReplCommand};

    #[test]
    fn test_prompt_without_dataset() {
        let session = SelectorSession::new();
        assert_eq!(SelectorPrompt::render(&session), "colsift > ");
    }

    #[test]
    fn test_prompt_shows_file_and_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"a,b\n1,2\n").unwrap();

        let mut session = SelectorSession::new();
        session
            .execute(ReplCommand::Open {
                path: path.to_string_lossy().into_owned(),
            })
            .unwrap();
        session
            .execute(CommandParser::parse("select a").unwrap())
            .unwrap();

        let prompt = SelectorPrompt::render(&session);
        assert_eq!(prompt, "colsift [data.csv: 1 rows, 1/2] > ");
    }
}
