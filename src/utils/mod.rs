//! Generic utility primitives with zero domain knowledge.
//!
//! - `artifact` - Newest-match artifact lookup and wheel filename parsing
//! - `command` - Command execution behind a swappable runner
//! - `shell` - Shell quoting for displayed commands

pub mod artifact;
pub mod command;
pub mod shell;
