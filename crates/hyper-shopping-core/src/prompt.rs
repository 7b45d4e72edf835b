//! Disambiguation UI boundary
//!
//! The resolver asks a human through this trait. Every call blocks until an
//! answer or a decline comes back. A decline (`None` / `false`) is a normal
//! answer; `Err` is reserved for the prompt itself failing (an I/O error).

use crate::error::Result;

/// A question shown to the user
#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    pub title: &'a str,
    pub text: &'a str,
}

impl<'a> Prompt<'a> {
    pub fn new(title: &'a str, text: &'a str) -> Self {
        Self { title, text }
    }
}

pub trait Prompter {
    /// Pick one of `options`, or decline
    fn choose_one(&mut self, prompt: Prompt<'_>, options: &[String]) -> Result<Option<String>>;

    /// Free text answer, or decline
    fn ask_text(&mut self, prompt: Prompt<'_>) -> Result<Option<String>>;

    /// Yes/no question; declining means no
    fn confirm(&mut self, prompt: Prompt<'_>) -> Result<bool>;
}
