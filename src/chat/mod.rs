//! Interactive chat with a Gemini model.
//!
//! This module ties the transcript, replay and presenter together into a
//! REPL-friendly session.  It supports:
//!
//! - A startup probe that must succeed before any session exists
//! - Word-by-word reveal of each answer
//! - Slash commands for session control
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The prompt cycle and conversation reset
//! - [`commands`]: Slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, SessionState, SessionStats};
