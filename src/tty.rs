//! Terminal I/O utilities for CLI.
//!
//! Provides user prompting and the terminal-backed confirmation.

use std::io::{self, BufRead, Write};

use shipwright::confirm::Confirmation;

pub fn prompt(message: &str) -> shipwright::Result<String> {
    eprint!("{}", message);
    io::stderr().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line).map_err(|e| {
        shipwright::Error::internal_io(
            format!("Failed to read input: {}", e),
            Some("read stdin".to_string()),
        )
    })?;

    Ok(line.trim().to_string())
}

/// Answers confirmations from stdin. End of input counts as an empty answer.
pub struct TtyConfirmation;

impl Confirmation for TtyConfirmation {
    fn ask(&mut self, message: &str) -> shipwright::Result<String> {
        prompt(message)
    }
}
