use crate::error::{PrupError, Result};
use crate::services::Prompter;
use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

/// Yes/no prompts on the controlling terminal.
///
/// Prompting needs both stdin and stderr attached to a terminal; the question
/// goes to stderr so stdout stays clean for scripting.
pub struct TerminalPrompter {
    enabled: bool,
}

impl TerminalPrompter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Prompter for TerminalPrompter {
    fn can_prompt(&self) -> bool {
        self.enabled && io::stdin().is_terminal() && io::stderr().is_terminal()
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stderr();
        ask(&mut input, &mut output, message, default)
    }
}

/// Ask until the answer parses; an empty answer takes `default`.
pub fn ask<R, W>(input: &mut R, output: &mut W, message: &str, default: bool) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    let hint = if default { "[Y/n]" } else { "[y/N]" };

    loop {
        write!(output, "{} {} {} ", "?".cyan().bold(), message.bold(), hint.dimmed())?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Err(PrupError::Prompt("no answer received (end of input)".to_string()));
        }

        match answer.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => {
                writeln!(output, "{}", "Please answer with y(es) or n(o).".red())?;
            }
        }
    }
}
