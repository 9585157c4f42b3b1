//! Interactive chat application for conversing with Gemini.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! GOOGLE_API_KEY=... gemchat
//!
//! # Specify a model
//! gemchat --model gemini-2.5-flash
//!
//! # Replay earlier turns live instead of inserting them directly
//! gemchat --replay live
//!
//! # Disable colors (useful for piping output)
//! gemchat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Reset the conversation to the greeting
//! - `/history` - Show the conversation so far
//! - `/status` - Show connection status and session statistics
//! - `/quit` - Exit the application

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemchat::Gemini;
use gemchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use gemchat::client::API_KEY_ENV;

/// Main entry point for the gemchat application.
#[tokio::main]
async fn main() -> ExitCode {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemchat [OPTIONS]");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemchat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match ChatConfig::try_from(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let use_color = config.use_color;
    let model = config.model.clone();

    let client = match Gemini::with_options(None, config.base_url.clone(), None) {
        Ok(client) => client,
        Err(err) if err.is_authentication() => {
            eprintln!("Please set {API_KEY_ENV} to your Gemini API key.");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = match ChatSession::connect(client, config).await {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Failed to connect to {model}: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&mut session, use_color).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the REPL until the user quits.
async fn run(session: &mut ChatSession, use_color: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupting a reveal in progress; cleared as each reveal starts
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;
    let mut renderer = PlainTextRenderer::with_color(use_color).with_interrupt(interrupted);

    renderer.print_info(&format!("Gemini Chat ({})", session.status()));
    renderer.print_info("Type /help for commands, /quit to exit\n");
    session.render_transcript(&mut renderer);

    loop {
        session.await_input();

        match rl.readline("You: ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.reset(&mut renderer);
                        }
                        ChatCommand::History => {
                            session.render_transcript(&mut renderer);
                        }
                        ChatCommand::Help => {
                            renderer.print_info(help_text());
                        }
                        ChatCommand::Status => {
                            renderer.print_info(&format!(
                                "{}\n{}",
                                session.status(),
                                session.stats()
                            ));
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                session.submit(line, &mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}
