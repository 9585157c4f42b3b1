//! A chat session against a stateless completion backend.
//!
//! The Gemini API keeps no conversation state, so a [`Conversation`] holds the
//! history locally and sends all of it with every message.

use crate::error::Result;
use crate::model_handle::Completion;
use crate::types::Content;

/// History plus the backend it is answered by.
pub struct Conversation<'a, C: Completion + ?Sized> {
    backend: &'a C,
    history: Vec<Content>,
}

impl<'a, C: Completion + ?Sized> Conversation<'a, C> {
    /// Start a conversation with empty history.
    pub fn new(backend: &'a C) -> Self {
        Self {
            backend,
            history: Vec::new(),
        }
    }

    /// Send `text` as a user message and return the model's reply.
    ///
    /// Both the message and the reply are recorded in the history.  On error
    /// the history is left as it was before the call.
    pub async fn send_message(&mut self, text: &str) -> Result<String> {
        self.history.push(Content::user(text));
        match self.backend.generate(&self.history).await {
            Ok(reply) => {
                self.history.push(Content::model(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                self.history.pop();
                Err(err)
            }
        }
    }

    /// Append `content` to the history without generating anything.
    pub fn push_history(&mut self, content: Content) {
        self.history.push(content);
    }

    /// The recorded history, oldest first.
    pub fn history(&self) -> &[Content] {
        &self.history
    }
}
