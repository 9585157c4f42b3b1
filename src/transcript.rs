//! In-memory conversation transcript.
//!
//! A [`Transcript`] is the ordered list of [`Turn`]s of one chat session.  It
//! always starts with the assistant greeting and only changes by appending a
//! turn or by resetting back to the greeting.

use std::fmt;

use crate::types::{Content, Role};

/// Greeting the assistant opens every transcript with.
pub const GREETING: &str = "Hello! I'm your Gemini assistant. How can I help you today?";

/// Who wrote a turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Author {
    /// The person chatting.
    User,
    /// The model.
    Assistant,
}

impl Author {
    /// The wire role used when this author's text is sent as history.
    pub fn role(self) -> Role {
        match self {
            Author::User => Role::User,
            Author::Assistant => Role::Model,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::User => f.write_str("user"),
            Author::Assistant => f.write_str("assistant"),
        }
    }
}

/// One message of the conversation.  Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Author,
    content: String,
}

impl Turn {
    /// Create a turn.
    pub fn new(role: Author, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Author::User, content)
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Author::Assistant, content)
    }

    /// Who wrote this turn.
    pub fn role(&self) -> Author {
        self.role
    }

    /// The text of this turn.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// This turn as a history entry for the API.
    pub fn to_content(&self) -> Content {
        Content::new(self.role.role(), self.content.clone())
    }
}

/// Ordered history of turns for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// A transcript holding only the greeting.
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
        }
    }

    /// Append a turn to the end of the conversation.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Drop every turn and start over from the greeting.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.turns.push(Turn::assistant(GREETING));
    }

    /// Number of turns, greeting included.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// All turns in conversation order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Every turn except the final one.
    ///
    /// While a prompt is being answered the final turn is that prompt, so this
    /// is the history it has to be answered against.
    pub fn prior_turns(&self) -> &[Turn] {
        match self.turns.split_last() {
            Some((_, prior)) => prior,
            None => &[],
        }
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
