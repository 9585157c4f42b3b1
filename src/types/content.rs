use serde::{Deserialize, Serialize};

/// Role of a content entry in a Gemini conversation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text written by the person chatting.
    User,

    /// Text generated by the model.
    Model,
}

/// A single part of a content entry.
///
/// Only text parts are produced or consumed; other part kinds returned by the
/// API deserialize with `text` unset and are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Part {
    /// The text of this part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// A role-tagged entry of conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// Who produced this content.
    ///
    /// The API omits the role on some responses; it defaults to `model` there.
    #[serde(default = "default_role")]
    pub role: Role,

    /// The parts of this content.
    #[serde(default)]
    pub parts: Vec<Part>,
}

fn default_role() -> Role {
    Role::Model
}

impl Content {
    /// Create a new `Content` with a single text part.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a user content with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a model content with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// Concatenated text of every text part.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}
