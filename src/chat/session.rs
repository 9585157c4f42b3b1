//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript of
//! one conversation and turns each prompt into a presented, recorded answer.

use std::fmt;

use crate::chat::config::ChatConfig;
use crate::client::Gemini;
use crate::error::Result;
use crate::model_handle::{Completion, ConnectionStatus, ModelHandle};
use crate::observability::{SESSION_RESETS, SESSION_TURNS};
use crate::presenter::Presenter;
use crate::render::Renderer;
use crate::replay::{ReplayMode, respond};
use crate::transcript::{Author, Transcript, Turn};
use crate::types::Model;

/// Where a session is in its prompt cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing in flight.
    Idle,
    /// Waiting for the next prompt.
    AwaitingInput,
    /// Answering a prompt: replay, generation and reveal.
    Generating,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The number of turns in the transcript, greeting included.
    pub message_count: usize,
    /// The number of user turns in the transcript.
    pub user_turns: usize,
    /// Prompts answered since the session started, across resets.
    pub total_prompts: u64,
    /// How prior turns are replayed.
    pub replay_mode: ReplayMode,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session Statistics:")?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Replay: {}", self.replay_mode)?;
        writeln!(f, "  Messages: {}", self.message_count)?;
        writeln!(f, "  Your turns: {}", self.user_turns)?;
        write!(f, "  Prompts answered: {}", self.total_prompts)
    }
}

/// A chat session that manages the transcript and answers prompts.
///
/// Prompts are handled strictly one at a time: `submit` takes `&mut self`
/// and only returns once the answer has been presented and recorded.
pub struct ChatSession<C: Completion = ModelHandle> {
    backend: C,
    config: ChatConfig,
    transcript: Transcript,
    presenter: Presenter,
    state: SessionState,
    total_prompts: u64,
}

impl ChatSession<ModelHandle> {
    /// Probes the configured model and starts a session on success.
    ///
    /// # Errors
    ///
    /// Returns the probe's error; no session exists without a working model.
    pub async fn connect(client: Gemini, config: ChatConfig) -> Result<Self> {
        let handle = ModelHandle::initialize(client, config.model.clone(), config.probe_timeout)
            .await?
            .with_generation_config(config.generation_config());
        Ok(Self::with_backend(handle, config))
    }

    /// The connectivity status recorded at startup.
    pub fn status(&self) -> &ConnectionStatus {
        self.backend.status()
    }
}

impl<C: Completion> ChatSession<C> {
    /// Creates a new chat session answered by `backend`.
    pub fn with_backend(backend: C, config: ChatConfig) -> Self {
        let presenter = Presenter::new(config.reveal_delay);
        Self {
            backend,
            config,
            transcript: Transcript::new(),
            presenter,
            state: SessionState::Idle,
            total_prompts: 0,
        }
    }

    /// Marks the session as waiting for the next prompt.
    pub fn await_input(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::AwaitingInput;
        }
    }

    /// Answers `prompt` and returns the recorded assistant turn.
    ///
    /// This method:
    /// 1. Adds the user turn to the transcript
    /// 2. Replays the prior turns and generates the answer
    /// 3. Reveals the answer through `renderer`
    /// 4. Adds the revealed answer as an assistant turn
    ///
    /// Failures never escape: they are recorded and shown as an assistant
    /// turn starting with `Error:`.
    pub async fn submit(&mut self, prompt: &str, renderer: &mut dyn Renderer) -> Turn {
        self.state = SessionState::Generating;
        self.transcript.append(Turn::user(prompt));

        let response = respond(
            &self.backend,
            &self.transcript,
            prompt,
            self.config.replay_mode,
        )
        .await;
        let shown = self.presenter.present(&response, renderer).await;

        let turn = Turn::assistant(shown);
        self.transcript.append(turn.clone());
        self.total_prompts += 1;
        SESSION_TURNS.click();
        self.state = SessionState::Idle;
        turn
    }

    /// Resets the conversation to the greeting and redraws the display.
    pub fn reset(&mut self, renderer: &mut dyn Renderer) {
        self.transcript.reset();
        self.state = SessionState::Idle;
        SESSION_RESETS.click();
        tracing::info!("conversation reset");
        renderer.clear();
        self.render_transcript(renderer);
    }

    /// Draws every turn of the conversation.
    pub fn render_transcript(&self, renderer: &mut dyn Renderer) {
        for turn in self.transcript.turns() {
            renderer.print_turn(turn);
        }
    }

    /// The conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The current state of the prompt cycle.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The backend answering prompts.
    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            message_count: self.transcript.len(),
            user_turns: self
                .transcript
                .turns()
                .iter()
                .filter(|turn| turn.role() == Author::User)
                .count(),
            total_prompts: self.total_prompts,
            replay_mode: self.config.replay_mode,
        }
    }
}
