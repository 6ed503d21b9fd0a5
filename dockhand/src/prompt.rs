//! Terminal implementation of the prompt seam.

use libdockhand::error::{DockhandError, Result};
use libdockhand::prompt::{Prompt, parse_yes_no};
use libdockhand::selection::SelectionList;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// Asks on stderr and reads answers from stdin
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    color: bool,
}

impl TerminalPrompt {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn question(&self, message: &str) -> String {
        if self.color {
            format!("{} {}: ", "?".cyan().bold(), message)
        } else {
            format!("? {}: ", message)
        }
    }

    fn read_line(&self, message: &str) -> Result<Option<String>> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", self.question(message))
            .and_then(|_| stderr.flush())
            .map_err(|e| DockhandError::prompt_with_source("Failed to write prompt", e))?;

        let mut line = String::new();
        // EOF reads zero bytes and counts as an empty answer
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| DockhandError::prompt_with_source("Failed to read answer", e))?;

        Ok(non_empty(&line))
    }
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        self.read_line(message)
    }

    fn ask_secret(&mut self, message: &str) -> Result<Option<String>> {
        let answer = rpassword::prompt_password(self.question(message))
            .map_err(|e| DockhandError::prompt_with_source("Failed to read secret", e))?;
        Ok(non_empty(&answer))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        let answer = self.read_line(&format!("{} [{}]", message, hint))?;
        Ok(answer
            .as_deref()
            .and_then(parse_yes_no)
            .unwrap_or(default))
    }

    fn present(&mut self, title: &str, choices: &SelectionList) -> Result<()> {
        let title = if self.color {
            title.bold().to_string()
        } else {
            title.to_string()
        };
        eprint!("{}", render_choices(&title, choices));
        Ok(())
    }
}

/// Numbered listing shown before a selection question
pub fn render_choices(title: &str, choices: &SelectionList) -> String {
    let width = choices.len().to_string().len();
    let mut out = format!("{}\n", title);
    for (index, label) in choices.entries() {
        out.push_str(&format!("  {:>width$}) {}\n", index, label, width = width));
    }
    out
}

fn non_empty(answer: &str) -> Option<String> {
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
