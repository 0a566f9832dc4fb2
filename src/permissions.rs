//! Human confirmation gate for tool execution.
//!
//! Every command the model asks to run goes through a [`Confirm`]
//! implementation before a process is spawned. The terminal version asks
//! on stderr and reads one line from stdin.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Asks the human whether a command may run.
pub trait Confirm: Send + Sync {
    /// Returns `true` only when the human approved `command`.
    fn confirm(&self, command: &str) -> Result<bool>;
}

/// Prompts on the controlling terminal.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, command: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut err = io::stderr();
        Ok(prompt_user(command, &mut input, &mut err)?)
    }
}

/// Shows the whole of `command` and reads one answer line. EOF counts as a
/// refusal.
pub fn prompt_user(
    command: &str,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> io::Result<bool> {
    writeln!(out, "\n{}", "Model wants to run:".yellow().bold())?;
    for line in command.lines() {
        writeln!(out, "  {}", line.bold())?;
    }
    write!(out, "Execute? [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(out)?;
        return Ok(false);
    }
    Ok(is_approval(&answer))
}

/// An answer approves only when its first character is `y` or `Y`.
pub fn is_approval(answer: &str) -> bool {
    answer.starts_with(['y', 'Y'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_approval() {
        assert!(is_approval("y\n"));
        assert!(is_approval("Yes"));
        assert!(is_approval("yolo"));
        assert!(!is_approval("n\n"));
        assert!(!is_approval(""));
        assert!(!is_approval(" y"));
        assert!(!is_approval("\n"));
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut input = Cursor::new("y\nn\n");
        let mut out = Vec::new();
        assert!(prompt_user("ls -la", &mut input, &mut out).unwrap());
        assert!(!prompt_user("rm -rf /tmp/x", &mut input, &mut out).unwrap());
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("ls -la"));
        assert!(shown.contains("rm -rf /tmp/x"));
    }

    #[test]
    fn test_prompt_eof_declines() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        assert!(!prompt_user("echo hi", &mut input, &mut out).unwrap());
    }

    #[test]
    fn test_long_command_is_shown_in_full() {
        let command = format!("echo {} && rm -rf ~/important", "x".repeat(600));
        let mut input = Cursor::new("n\n");
        let mut out = Vec::new();
        prompt_user(&command, &mut input, &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains(&command));
        assert!(shown.contains("rm -rf ~/important"));
    }

    #[test]
    fn test_multiline_command_shows_every_line() {
        let command = "cd /tmp\nrm -rf build";
        let mut input = Cursor::new("n\n");
        let mut out = Vec::new();
        prompt_user(command, &mut input, &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("cd /tmp"));
        assert!(shown.contains("rm -rf build"));
    }
}
