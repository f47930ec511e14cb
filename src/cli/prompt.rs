//! Interactive single-choice prompts (the terminal's dropdowns).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Number of unparseable answers tolerated before giving up on a prompt
const MAX_ATTEMPTS: usize = 3;

/// Single-choice chooser over a list of options
pub trait Prompter {
    /// Ask the user to pick one of `options`; `None` when they skip
    fn choose(&mut self, label: &str, options: &[String]) -> Result<Option<String>>;
}

/// Prompter for non-interactive runs: every question is skipped
#[derive(Debug, Default)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn choose(&mut self, _label: &str, _options: &[String]) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Numbered-list prompter over any line reader/writer pair
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read answers from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn choose(&mut self, label: &str, options: &[String]) -> Result<Option<String>> {
        writeln!(self.output, "{}:", label)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }

        for _ in 0..MAX_ATTEMPTS {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("Failed to read answer")?;
            if read == 0 {
                return Ok(None);
            }

            let answer = line.trim();
            if answer.is_empty() {
                return Ok(None);
            }
            if let Some(option) = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i))
            {
                return Ok(Some(option.clone()));
            }
            if let Some(option) = options.iter().find(|o| o.as_str() == answer) {
                return Ok(Some(option.clone()));
            }

            writeln!(self.output, "Invalid choice: {}", answer)?;
        }

        Ok(None)
    }
}
