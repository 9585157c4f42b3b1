//! Context replay.
//!
//! Every prompt is answered in a fresh [`Conversation`] rebuilt from the
//! transcript.  Two ways of rebuilding it are supported:
//!
//! - [`ReplayMode::Direct`] inserts every prior turn into the history and makes
//!   a single call for the prompt.
//! - [`ReplayMode::Live`] re-sends each prior user turn as a live message and
//!   throws the regenerated reply away, inserting only assistant turns
//!   directly.  This costs one extra call per prior user turn.

use std::fmt;
use std::str::FromStr;

use crate::conversation::Conversation;
use crate::error::{Error, Result};
use crate::model_handle::Completion;
use crate::observability::{
    REPLAY_DIRECT_INSERTIONS, REPLAY_DISCARDED_SUBMISSIONS, REPLAY_FAILURES,
};
use crate::transcript::{Author, Transcript, Turn};

/// Prefix of every failed response.
pub const ERROR_PREFIX: &str = "Error: ";

/// How prior turns are rebuilt into the conversation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ReplayMode {
    /// Insert all prior turns into the history; one call per prompt.
    #[default]
    Direct,
    /// Re-send prior user turns live and discard the regenerated replies.
    Live,
}

impl fmt::Display for ReplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayMode::Direct => f.write_str("direct"),
            ReplayMode::Live => f.write_str("live"),
        }
    }
}

impl FromStr for ReplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(ReplayMode::Direct),
            "live" => Ok(ReplayMode::Live),
            other => Err(Error::configuration(format!(
                "unknown replay mode {other:?} (expected \"direct\" or \"live\")"
            ))),
        }
    }
}

/// Result of a successful replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// The model's answer to the prompt.
    pub text: String,
    /// Live calls whose replies were thrown away.
    pub discarded_submissions: usize,
    /// Turns inserted into the history without a call.
    pub direct_insertions: usize,
}

/// Rebuild `prior` into a new conversation and answer `prompt` in it.
pub async fn replay<C: Completion + ?Sized>(
    backend: &C,
    prior: &[Turn],
    prompt: &str,
    mode: ReplayMode,
) -> Result<ReplayOutcome> {
    let mut conversation = Conversation::new(backend);
    let mut discarded_submissions = 0;
    let mut direct_insertions = 0;

    for turn in prior {
        match (mode, turn.role()) {
            (ReplayMode::Live, Author::User) => {
                conversation.send_message(turn.content()).await?;
                discarded_submissions += 1;
            }
            _ => {
                conversation.push_history(turn.to_content());
                direct_insertions += 1;
            }
        }
    }
    REPLAY_DISCARDED_SUBMISSIONS.count(discarded_submissions as u64);
    REPLAY_DIRECT_INSERTIONS.count(direct_insertions as u64);

    // In live mode each regenerated reply stays in the history, directly
    // followed by the assistant turn that was actually shown.
    let text = conversation.send_message(prompt).await?;
    tracing::debug!(
        %mode,
        discarded_submissions,
        direct_insertions,
        history = conversation.history().len(),
        "replay complete"
    );
    Ok(ReplayOutcome {
        text,
        discarded_submissions,
        direct_insertions,
    })
}

/// Answer the final turn of `transcript` given everything before it.
///
/// Never fails: errors come back as text starting with [`ERROR_PREFIX`].
pub async fn respond<C: Completion + ?Sized>(
    backend: &C,
    transcript: &Transcript,
    prompt: &str,
    mode: ReplayMode,
) -> String {
    match replay(backend, transcript.prior_turns(), prompt, mode).await {
        Ok(outcome) => outcome.text,
        Err(err) => {
            REPLAY_FAILURES.click();
            tracing::warn!(error = %err, "failed to answer prompt");
            error_text(&err)
        }
    }
}

/// Render `err` as a response.
pub fn error_text(err: &Error) -> String {
    format!("{ERROR_PREFIX}{err}")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::transcript::GREETING;
    use crate::types::Content;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<Content>>>,
        fail_on_call: Option<usize>,
    }

    impl Recorder {
        fn failing_on(call: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_call: Some(call),
            }
        }

        fn calls(&self) -> Vec<Vec<Content>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Completion for Recorder {
        async fn generate(&self, contents: &[Content]) -> Result<String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(contents.to_vec());
            if self.fail_on_call == Some(calls.len()) {
                return Err(Error::service_unavailable("overloaded", None));
            }
            Ok(format!("reply {}", calls.len()))
        }
    }

    fn conversation() -> Vec<Turn> {
        vec![
            Turn::assistant(GREETING),
            Turn::user("first"),
            Turn::assistant("answer one"),
            Turn::user("second"),
            Turn::assistant("answer two"),
        ]
    }

    #[test]
    fn parse_mode() {
        assert_eq!("live".parse::<ReplayMode>().unwrap(), ReplayMode::Live);
        assert_eq!(" Direct ".parse::<ReplayMode>().unwrap(), ReplayMode::Direct);
        assert!("eager".parse::<ReplayMode>().is_err());
        assert_eq!(ReplayMode::default(), ReplayMode::Direct);
    }

    #[tokio::test]
    async fn first_prompt_is_a_single_call() {
        for mode in [ReplayMode::Direct, ReplayMode::Live] {
            let backend = Recorder::default();
            let outcome = replay(&backend, &[], "Hi", mode).await.unwrap();
            assert_eq!(outcome.discarded_submissions, 0);
            assert_eq!(outcome.direct_insertions, 0);
            assert_eq!(backend.calls(), vec![vec![Content::user("Hi")]]);
        }
    }

    #[tokio::test]
    async fn live_mode_resends_user_turns() {
        let backend = Recorder::default();
        let outcome = replay(&backend, &conversation(), "third", ReplayMode::Live)
            .await
            .unwrap();

        // Two prior user turns, three prior assistant turns.
        assert_eq!(outcome.discarded_submissions, 2);
        assert_eq!(outcome.direct_insertions, 3);
        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(outcome.text, "reply 3");
        assert_eq!(
            calls[0],
            vec![Content::model(GREETING), Content::user("first")]
        );
        assert_eq!(
            calls[1],
            vec![
                Content::model(GREETING),
                Content::user("first"),
                Content::model("reply 1"),
                Content::model("answer one"),
                Content::user("second"),
            ]
        );
        assert_eq!(
            calls[2].last(),
            Some(&Content::user("third")),
            "the prompt is submitted last"
        );
    }

    #[tokio::test]
    async fn direct_mode_makes_one_call() {
        let backend = Recorder::default();
        let outcome = replay(&backend, &conversation(), "third", ReplayMode::Direct)
            .await
            .unwrap();

        assert_eq!(outcome.discarded_submissions, 0);
        assert_eq!(outcome.direct_insertions, 5);
        assert_eq!(
            backend.calls(),
            vec![vec![
                Content::model(GREETING),
                Content::user("first"),
                Content::model("answer one"),
                Content::user("second"),
                Content::model("answer two"),
                Content::user("third"),
            ]]
        );
    }

    #[tokio::test]
    async fn greeting_only_history() {
        let backend = Recorder::default();
        let prior = [Turn::assistant(GREETING)];
        let outcome = replay(&backend, &prior, "Hi", ReplayMode::Live)
            .await
            .unwrap();
        assert_eq!(outcome.discarded_submissions, 0);
        assert_eq!(outcome.direct_insertions, 1);
        assert_eq!(
            backend.calls(),
            vec![vec![Content::model(GREETING), Content::user("Hi")]]
        );
    }

    #[tokio::test]
    async fn failure_during_replay_becomes_error_text() {
        let backend = Recorder::failing_on(1);
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("first"));
        transcript.append(Turn::assistant("answer one"));
        transcript.append(Turn::user("second"));

        let text = respond(&backend, &transcript, "second", ReplayMode::Live).await;
        assert!(text.starts_with("Error:"), "{text}");
        assert!(text.contains("overloaded"));
        assert_eq!(backend.calls().len(), 1, "replay stops at the first failure");
    }

    #[tokio::test]
    async fn respond_excludes_pending_prompt_from_history() {
        let backend = Recorder::default();
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("Hi"));

        let text = respond(&backend, &transcript, "Hi", ReplayMode::Direct).await;
        assert_eq!(text, "reply 1");
        assert_eq!(
            backend.calls(),
            vec![vec![Content::model(GREETING), Content::user("Hi")]]
        );
    }
}
