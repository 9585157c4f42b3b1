//! Word-by-word reveal of a finished response.
//!
//! The full response text is already known when presentation starts; the
//! presenter only paces how it appears.

use std::time::Duration;

use crate::observability::PRESENTER_TOKENS;
use crate::render::Renderer;

/// Marker drawn after the revealed text while the reveal is running.
pub const CURSOR: &str = "▌";

/// Pause between two revealed words.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(50);

/// Reveals text through a [`Renderer`] one whitespace-delimited word at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Presenter {
    delay: Duration,
}

impl Presenter {
    /// A presenter pausing `delay` before each word.  Zero disables pacing.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Reveal `text` and return the form that was finally shown.
    ///
    /// One placeholder write happens per word, each showing every word so far
    /// followed by [`CURSOR`].  The last write shows the words joined by single
    /// spaces without the cursor; that string is returned.  Runs of whitespace
    /// in `text` are not preserved.
    ///
    /// Once the renderer asks for an interrupt the remaining pauses are
    /// skipped; the writes and the returned text are unchanged.
    pub async fn present(&self, text: &str, renderer: &mut dyn Renderer) -> String {
        renderer.start_response();
        let mut accumulator = String::with_capacity(text.len() + 1);
        let mut interrupted = false;
        let mut tokens = 0u64;
        for token in text.split_whitespace() {
            accumulator.push_str(token);
            accumulator.push(' ');
            interrupted = interrupted || renderer.should_interrupt();
            if !interrupted && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            renderer.write_response(&format!("{accumulator}{CURSOR}"));
            tokens += 1;
        }
        PRESENTER_TOKENS.count(tokens);
        if interrupted {
            tracing::debug!(tokens, "reveal interrupted");
        }

        accumulator.truncate(accumulator.trim_end().len());
        renderer.write_response(&accumulator);
        renderer.finish_response();
        accumulator
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Turn;
    use tokio::time::Instant;

    #[derive(Default)]
    struct Surface {
        writes: Vec<String>,
        started: usize,
        finished: usize,
        interrupt: bool,
    }

    impl Renderer for Surface {
        fn clear(&mut self) {}
        fn print_turn(&mut self, _turn: &Turn) {}
        fn start_response(&mut self) {
            self.started += 1;
        }
        fn write_response(&mut self, text: &str) {
            self.writes.push(text.to_string());
        }
        fn finish_response(&mut self) {
            self.finished += 1;
        }
        fn print_error(&mut self, _error: &str) {}
        fn print_info(&mut self, _info: &str) {}
        fn should_interrupt(&self) -> bool {
            self.interrupt
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_write_per_word_then_final() {
        let mut surface = Surface::default();
        let shown = Presenter::default()
            .present("The quick  brown\n\tfox", &mut surface)
            .await;

        assert_eq!(shown, "The quick brown fox");
        assert_eq!(
            surface.writes,
            vec![
                "The ▌".to_string(),
                "The quick ▌".to_string(),
                "The quick brown ▌".to_string(),
                "The quick brown fox ▌".to_string(),
                "The quick brown fox".to_string(),
            ]
        );
        assert_eq!((surface.started, surface.finished), (1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn writes_extend_each_other() {
        let mut surface = Surface::default();
        Presenter::default()
            .present("alpha beta gamma delta", &mut surface)
            .await;
        let bodies: Vec<&str> = surface
            .writes
            .iter()
            .map(|w| w.strip_suffix(CURSOR).unwrap_or(w))
            .collect();
        for pair in bodies.windows(2) {
            let (prev, next) = (pair[0].trim_end(), pair[1]);
            assert!(next.starts_with(prev), "{next:?} does not extend {prev:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_before_each_word() {
        let mut surface = Surface::default();
        let start = Instant::now();
        Presenter::new(Duration::from_millis(50))
            .present("one two three", &mut surface)
            .await;
        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_skips_pauses() {
        let mut surface = Surface {
            interrupt: true,
            ..Surface::default()
        };
        let start = Instant::now();
        let shown = Presenter::new(Duration::from_secs(1))
            .present("one two three", &mut surface)
            .await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(shown, "one two three");
        assert_eq!(surface.writes.len(), 4);
    }

    #[tokio::test]
    async fn empty_text_has_only_final_write() {
        let mut surface = Surface::default();
        let shown = Presenter::new(Duration::ZERO)
            .present(" \n ", &mut surface)
            .await;
        assert_eq!(shown, "");
        assert_eq!(surface.writes, vec![String::new()]);
    }
}
