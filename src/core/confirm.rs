//! Confirmation prompts as an injectable dependency.
//!
//! The binary answers from the terminal; tests and scripted callers pass a
//! closure or a canned answer.

use crate::error::Result;

/// Source of answers to yes/no style questions.
pub trait Confirmation {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

impl<F> Confirmation for F
where
    F: FnMut(&str) -> Result<String>,
{
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self(prompt)
    }
}

/// `true` only when `answer` equals `token`, ignoring case.
pub fn is_affirmative(answer: &str, token: &str) -> bool {
    answer.to_lowercase() == token.to_lowercase()
}
