// Public modules
pub mod chat;
pub mod client;
pub mod conversation;
pub mod error;
pub mod model_handle;
pub mod observability;
pub mod presenter;
pub mod render;
pub mod replay;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::Gemini;
pub use conversation::Conversation;
pub use error::{Error, Result};
pub use model_handle::{Completion, ConnectionStatus, ModelHandle};
pub use observability::register_biometrics;
pub use presenter::Presenter;
pub use render::{PlainTextRenderer, Renderer};
pub use replay::{ReplayMode, ReplayOutcome};
pub use transcript::{Author, GREETING, Transcript, Turn};
pub use types::*;
