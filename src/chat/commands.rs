//! Built-in slash commands for the chat REPL.
//!
//! A line is a command when its first whitespace-separated token is one of
//! `/exit`, `/quit`, `/clear` or `/help`. Anything else, including unknown
//! slash words, goes to the model.

use colored::Colorize;
use std::io::{self, Write};

use crate::conversation::Conversation;

/// What the REPL should do after a line has been checked for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandAction {
    /// The command ran; read the next line.
    Handled,
    /// Leave the REPL.
    Exit,
    /// Not a built-in; treat the line as a user turn.
    NotACommand,
}

/// Dispatch a built-in command, writing any feedback to `out`.
pub(crate) fn handle_command(
    line: &str,
    conversation: &mut Conversation,
    out: &mut dyn Write,
) -> io::Result<CommandAction> {
    let Some(command) = line.split_whitespace().next() else {
        return Ok(CommandAction::NotACommand);
    };

    match command {
        "/exit" | "/quit" => {
            writeln!(out, "Goodbye!")?;
            Ok(CommandAction::Exit)
        }
        "/clear" => {
            conversation.clear();
            writeln!(out, "{}\n", "Conversation cleared.".dimmed())?;
            Ok(CommandAction::Handled)
        }
        "/help" => {
            writeln!(out, "{}", "Commands:".bold())?;
            writeln!(out, "  {}  exit the chat", "/exit, /quit".cyan())?;
            writeln!(out, "  {}        clear conversation history", "/clear".cyan())?;
            writeln!(out, "  {}         show this help", "/help".cyan())?;
            writeln!(out, "  {}       exit", "Ctrl+D".cyan())?;
            writeln!(out)?;
            Ok(CommandAction::Handled)
        }
        _ => Ok(CommandAction::NotACommand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str, conversation: &mut Conversation) -> (CommandAction, String) {
        let mut out = Vec::new();
        let action = handle_command(line, conversation, &mut out).unwrap();
        (action, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_and_quit() {
        let mut conv = Conversation::new();
        for line in ["/exit", "/quit", "/quit now"] {
            let (action, out) = run(line, &mut conv);
            assert_eq!(action, CommandAction::Exit);
            assert_eq!(out, "Goodbye!\n");
        }
    }

    #[test]
    fn test_clear_empties_history() {
        let mut conv = Conversation::new();
        conv.add_user("hi");
        conv.add_assistant("hello");
        let (action, out) = run("/clear", &mut conv);
        assert_eq!(action, CommandAction::Handled);
        assert!(out.contains("Conversation cleared."));
        assert!(conv.is_empty());
    }

    #[test]
    fn test_help_lists_commands() {
        let (action, out) = run("/help", &mut Conversation::new());
        assert_eq!(action, CommandAction::Handled);
        assert!(out.contains("/exit"));
        assert!(out.contains("/clear"));
        assert!(out.contains("/help"));
    }

    #[test]
    fn test_everything_else_is_not_a_command() {
        let mut conv = Conversation::new();
        for line in ["hello", "/unknown", "/exitnow", "please /exit"] {
            let (action, out) = run(line, &mut conv);
            assert_eq!(action, CommandAction::NotACommand, "{line}");
            assert!(out.is_empty());
        }
    }
}
