//! Output rendering for the chat.
//!
//! This module provides the [`Renderer`] trait the session and the presenter
//! draw through, and a plain-text terminal implementation.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::presenter::CURSOR;
use crate::replay::ERROR_PREFIX;
use crate::transcript::{Author, Turn};

/// ANSI escape code for dim text (used for info lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for role labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the user label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI sequence clearing the screen and homing the cursor.
const ANSI_CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Erases the single character before the terminal cursor.
const ERASE_ONE: &str = "\x08 \x08";

/// Trait for rendering chat output.
///
/// A response is drawn through a placeholder: after [`Renderer::start_response`]
/// every [`Renderer::write_response`] replaces what the placeholder shows.
pub trait Renderer: Send {
    /// Clear the display before the conversation is drawn again.
    fn clear(&mut self);

    /// Print a complete turn.
    fn print_turn(&mut self, turn: &Turn);

    /// Called before the first write of a response.
    fn start_response(&mut self);

    /// Replace the content of the response placeholder.
    fn write_response(&mut self, text: &str);

    /// Called after the last write of a response.
    fn finish_response(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Returns true if the running reveal should be cut short.
    fn should_interrupt(&self) -> bool {
        false
    }
}

/// Plain text renderer with optional ANSI styling.
///
/// Responses are drawn incrementally: each placeholder write only prints the
/// text added since the previous write.  The typing cursor is drawn only when
/// color is enabled, since erasing it relies on the terminal honoring
/// backspace.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    shown: String,
    cursor_shown: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer drawing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            shown: String::new(),
            cursor_shown: false,
            interrupted: None,
        }
    }

    /// Attaches an interrupt flag to the renderer.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    /// Consumes the renderer and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    // Terminal write failures are not actionable mid-conversation.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn label(&mut self, author: Author) {
        let (name, color) = match author {
            Author::User => ("You", ANSI_GREEN),
            Author::Assistant => ("Gemini", ANSI_CYAN),
        };
        if self.use_color {
            self.emit(&format!("{ANSI_BOLD}{color}{name}:{ANSI_RESET} "));
        } else {
            self.emit(&format!("{name}: "));
        }
    }

    fn body(&mut self, text: &str) {
        if self.use_color && text.starts_with(ERROR_PREFIX.trim_end()) {
            self.emit(&format!("{ANSI_RED}{text}{ANSI_RESET}"));
        } else {
            self.emit(text);
        }
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn clear(&mut self) {
        if self.use_color {
            self.emit(ANSI_CLEAR_SCREEN);
        } else {
            self.emit("\n");
        }
        self.flush();
    }

    fn print_turn(&mut self, turn: &Turn) {
        self.label(turn.role());
        self.body(turn.content());
        self.emit("\n");
        self.flush();
    }

    fn start_response(&mut self) {
        // An interrupt only applies to the reveal it was pressed during.
        if let Some(flag) = &self.interrupted {
            flag.store(false, Ordering::Relaxed);
        }
        self.shown.clear();
        self.cursor_shown = false;
        self.label(Author::Assistant);
        self.flush();
    }

    fn write_response(&mut self, text: &str) {
        let (body, cursor) = match text.strip_suffix(CURSOR) {
            Some(body) => (body, self.use_color),
            None => (text, false),
        };
        if self.cursor_shown {
            self.emit(ERASE_ONE);
        }
        match body.strip_prefix(self.shown.as_str()) {
            Some(added) => self.emit(added),
            // Trailing whitespace dropped from the final write.  Plain output
            // keeps it since it may not be going to a terminal.
            None if self.shown.starts_with(body) => {
                if self.use_color {
                    let dropped = self.shown[body.len()..].chars().count();
                    self.emit(&ERASE_ONE.repeat(dropped));
                }
            }
            None => {
                // Not an extension of what is on screen; redraw on a new line.
                self.emit("\n");
                self.emit(body);
            }
        }
        if cursor {
            self.emit(CURSOR);
        }
        self.shown = body.to_string();
        self.cursor_shown = cursor;
        self.flush();
    }

    fn finish_response(&mut self) {
        if self.cursor_shown {
            self.emit(ERASE_ONE);
            self.cursor_shown = false;
        }
        self.shown.clear();
        self.emit("\n");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            self.emit(&format!("{ANSI_RED}Error: {error}{ANSI_RESET}\n"));
        } else {
            self.emit(&format!("Error: {error}\n"));
        }
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        if self.use_color {
            self.emit(&format!("{ANSI_DIM}{info}{ANSI_RESET}\n"));
        } else {
            self.emit(&format!("{info}\n"));
        }
        self.flush();
    }

    fn should_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: PlainTextRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn plain_turns_are_labelled() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        renderer.print_turn(&Turn::assistant("Hello!"));
        renderer.print_turn(&Turn::user("Hi"));
        assert_eq!(output(renderer), "Gemini: Hello!\nYou: Hi\n");
    }

    #[test]
    fn plain_response_prints_only_new_text() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        renderer.start_response();
        renderer.write_response(&format!("one {CURSOR}"));
        renderer.write_response(&format!("one two {CURSOR}"));
        renderer.write_response("one two");
        renderer.finish_response();
        assert_eq!(output(renderer), "Gemini: one two \n");
    }

    #[test]
    fn colored_response_erases_cursor() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), true);
        renderer.start_response();
        renderer.write_response(&format!("one {CURSOR}"));
        renderer.write_response("one");
        renderer.finish_response();
        let out = output(renderer);
        assert!(out.contains(&format!("one {CURSOR}{ERASE_ONE}")));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn colored_final_write_erases_dropped_space() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), true);
        renderer.start_response();
        renderer.write_response(&format!("one {CURSOR}"));
        renderer.write_response(&format!("one two {CURSOR}"));
        renderer.write_response("one two");
        renderer.finish_response();
        let out = output(renderer);
        assert!(
            out.ends_with(&format!("two {CURSOR}{ERASE_ONE}{ERASE_ONE}\n")),
            "{out:?}"
        );
    }

    #[test]
    fn start_response_clears_stale_interrupt() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut renderer =
            PlainTextRenderer::with_writer(Vec::new(), false).with_interrupt(flag.clone());
        renderer.start_response();
        assert!(!renderer.should_interrupt());
        assert!(!flag.load(Ordering::Relaxed));
    }

    #[test]
    fn interrupt_flag_is_observed() {
        let flag = Arc::new(AtomicBool::new(false));
        let renderer =
            PlainTextRenderer::with_writer(Vec::new(), false).with_interrupt(flag.clone());
        assert!(!renderer.should_interrupt());
        flag.store(true, Ordering::Relaxed);
        assert!(renderer.should_interrupt());
    }
}
