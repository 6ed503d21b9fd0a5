//! User prompt seam.
//!
//! Every question dockhand asks goes through [`Prompt`], so the resolver can be
//! driven by a terminal in the CLI and by a script in tests. An empty answer is
//! `Ok(None)`: the user skipped the question, which is never an error.

use crate::error::Result;
use crate::selection::SelectionList;
use std::collections::VecDeque;

#[cfg(test)]
mod tests;

/// Asks the user questions.
pub trait Prompt {
    /// Asks for a line of text. Returns `None` when the answer is empty.
    fn ask(&mut self, message: &str) -> Result<Option<String>>;

    /// Asks for a secret without echoing it. Returns `None` when empty.
    fn ask_secret(&mut self, message: &str) -> Result<Option<String>>;

    /// Asks a yes/no question; an empty answer picks `default`.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// Shows a numbered list of choices under `title`.
    fn present(&mut self, title: &str, choices: &SelectionList) -> Result<()>;
}

/// [`Prompt`] that answers from a fixed script.
///
/// Answers are consumed in order by `ask`, `ask_secret` and `confirm` alike;
/// an exhausted script answers as if the user pressed enter. Questions and
/// presented lists are recorded for inspection.
///
/// # Examples
///
/// ```
/// use libdockhand::prompt::{Prompt, ScriptedPrompt};
///
/// let mut prompt = ScriptedPrompt::new(["nginx", ""]);
/// assert_eq!(prompt.ask("Repository").unwrap().as_deref(), Some("nginx"));
/// assert_eq!(prompt.ask("Tag").unwrap(), None);
/// assert_eq!(prompt.questions(), ["Repository", "Tag"]);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    questions: Vec<String>,
    presented: Vec<(String, SelectionList)>,
}

impl ScriptedPrompt {
    /// Creates a prompt that gives `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Questions asked so far, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Lists presented so far, with their titles.
    pub fn presented(&self) -> &[(String, SelectionList)] {
        &self.presented
    }

    /// Number of answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, message: &str) -> Option<String> {
        self.questions.push(message.to_string());
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        Ok(self.next_answer(message))
    }

    fn ask_secret(&mut self, message: &str) -> Result<Option<String>> {
        Ok(self.next_answer(message))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Ok(match self.next_answer(message) {
            Some(answer) => parse_yes_no(&answer).unwrap_or(default),
            None => default,
        })
    }

    fn present(&mut self, title: &str, choices: &SelectionList) -> Result<()> {
        self.presented.push((title.to_string(), choices.clone()));
        Ok(())
    }
}

/// Interprets a yes/no answer. Returns `None` for anything else.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
