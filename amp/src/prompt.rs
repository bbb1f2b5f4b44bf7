//! Interactive confirmation prompts

use amp_core::Result;
use std::io::{BufRead, Write};

/// Asks the user a yes/no question.
pub trait Prompt {
    /// Returns `true` when the answer starts with `y` (case-insensitive).
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Whether a free-form answer counts as yes.
pub fn is_yes(answer: &str) -> bool {
    answer.trim_start().to_lowercase().starts_with('y')
}

/// Prompt on the controlling terminal's stdin/stderr.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}? [y/N] ", question)?;
        stderr.flush()?;

        let mut answer = String::new();
        // EOF reads as an empty answer
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}
