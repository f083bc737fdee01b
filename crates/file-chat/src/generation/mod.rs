//! Prompt construction for backend requests

pub mod prompt;

pub use prompt::{truncate_chars, PromptBuilder};
