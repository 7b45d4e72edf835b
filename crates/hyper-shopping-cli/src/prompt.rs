//! Line-based terminal prompts

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use colored::Colorize;

use hyper_shopping_core::{Prompt, Prompter, Result};

/// Invalid menu answers tolerated before the question counts as declined
const MAX_ATTEMPTS: usize = 3;

/// Asks questions on `output` and reads answers from `input`.
///
/// End of input and blank answers both decline.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn header(&mut self, prompt: &Prompt<'_>) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", prompt.title.bold())?;
        if !prompt.text.is_empty() {
            writeln!(self.output, "{}", prompt.text)?;
        }
        Ok(())
    }

    /// Next trimmed answer; `None` on end of input or a blank line
    fn read_answer(&mut self, marker: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", marker)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose_one(&mut self, prompt: Prompt<'_>, options: &[String]) -> Result<Option<String>> {
        self.header(&prompt)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", i + 1, option)?;
        }
        writeln!(self.output, "  {}", "(blank to skip)".dimmed())?;

        for _ in 0..MAX_ATTEMPTS {
            let Some(answer) = self.read_answer(">")? else {
                return Ok(None);
            };
            let picked = match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => Some(options[n - 1].clone()),
                _ => options.iter().find(|o| **o == answer).cloned(),
            };
            if picked.is_some() {
                return Ok(picked);
            }
            writeln!(
                self.output,
                "{} Enter a number between 1 and {}",
                "[WARN]".yellow(),
                options.len()
            )?;
        }
        Ok(None)
    }

    fn ask_text(&mut self, prompt: Prompt<'_>) -> Result<Option<String>> {
        self.header(&prompt)?;
        self.read_answer(">")
    }

    fn confirm(&mut self, prompt: Prompt<'_>) -> Result<bool> {
        self.header(&prompt)?;
        let answer = self.read_answer("[y/N]")?;
        Ok(matches!(
            answer.map(|a| a.to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}
