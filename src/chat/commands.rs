//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Reset the conversation to the greeting.
    Clear,

    /// Draw the whole conversation again.
    History,

    /// Show connectivity status and session statistics.
    Status,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent to the model as a regular message.
///
/// # Examples
///
/// ```
/// # use gemchat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
/// assert!(parse_command("Hello, Gemini!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" | "reset" => ChatCommand::Clear,
        "history" => ChatCommand::History,
        "status" | "stats" => ChatCommand::Status,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "" => return None,
        other => {
            return Some(ChatCommand::Invalid(format!(
                "unknown command /{other} (try /help)"
            )));
        }
    };

    if let Some(argument) = argument {
        return Some(ChatCommand::Invalid(format!(
            "/{command} takes no arguments (got {argument:?})"
        )));
    }
    Some(result)
}

/// Returns the help text for the available commands.
pub fn help_text() -> &'static str {
    "Commands:
  /clear     Clear the chat history
  /history   Show the conversation so far
  /status    Show connection status and session statistics
  /help      Show this help
  /quit      Exit (Ctrl+D also works)

Press Ctrl+C while a response is appearing to show the rest at once."
}
