//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.  The API key is never taken from
//! the command line; it comes from `GOOGLE_API_KEY`.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::error::Error;
use crate::model_handle::DEFAULT_PROBE_TIMEOUT;
use crate::presenter::DEFAULT_REVEAL_DELAY;
use crate::replay::ReplayMode;
use crate::types::{GenerationConfig, Model};

/// Command-line arguments for the gemchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-1.5-flash-latest)", "MODEL")]
    pub model: Option<String>,

    /// Override the API endpoint.
    #[arrrg(optional, "API base URL (default: the public Gemini endpoint)", "URL")]
    pub base_url: Option<String>,

    /// Upper bound on the startup probe.
    #[arrrg(optional, "Seconds to wait for the startup probe (default: 5)", "SECS")]
    pub probe_timeout_secs: Option<u64>,

    /// Pause between revealed words.
    #[arrrg(optional, "Milliseconds between revealed words (default: 50)", "MS")]
    pub reveal_delay_ms: Option<u64>,

    /// How prior turns are replayed.
    #[arrrg(optional, "History replay: direct or live (default: direct)", "MODE")]
    pub replay: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max output tokens per response (default: model limit)", "TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Custom API base URL, if any.
    pub base_url: Option<String>,

    /// Upper bound on the startup probe.
    pub probe_timeout: Duration,

    /// Pause between revealed words.
    pub reveal_delay: Duration,

    /// How prior turns are replayed for each prompt.
    pub replay_mode: ReplayMode,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional cap on tokens per response.
    pub max_output_tokens: Option<u32>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-1.5-flash-latest
    /// - Probe timeout: 5 seconds
    /// - Reveal delay: 50 milliseconds
    /// - Replay: direct
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            base_url: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            replay_mode: ReplayMode::default(),
            use_color: true,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the startup probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Sets the pause between revealed words.
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Sets the replay mode.
    pub fn with_replay_mode(mut self, mode: ReplayMode) -> Self {
        self.replay_mode = mode;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the cap on tokens per response.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// The sampling parameters sent with every request.
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            ..GenerationConfig::default()
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self, Self::Error> {
        let replay_mode = match args.replay.as_deref() {
            Some(mode) => mode.parse()?,
            None => ReplayMode::default(),
        };
        if args.probe_timeout_secs == Some(0) {
            return Err(Error::configuration(
                "--probe-timeout-secs must be at least 1",
            ));
        }
        let model = match args.model {
            Some(name) => match name.parse::<Model>() {
                Ok(model) => model,
                Err(never) => match never {},
            },
            None => Model::default(),
        };

        let defaults = ChatConfig::new();
        Ok(ChatConfig {
            model,
            base_url: args.base_url,
            probe_timeout: args
                .probe_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.probe_timeout),
            reveal_delay: args
                .reveal_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_delay),
            replay_mode,
            use_color: !args.no_color,
            max_output_tokens: args.max_output_tokens,
            ..defaults
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini15FlashLatest));
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.reveal_delay, Duration::from_millis(50));
        assert_eq!(config.replay_mode, ReplayMode::Direct);
        assert!(config.use_color);
        assert!(config.base_url.is_none());
        assert!(config.generation_config().is_empty());
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::try_from(ChatArgs::default()).unwrap();
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            base_url: Some("http://localhost:8080/v1beta/".to_string()),
            probe_timeout_secs: Some(2),
            reveal_delay_ms: Some(0),
            replay: Some("live".to_string()),
            max_output_tokens: Some(512),
            no_color: true,
        };
        let config = ChatConfig::try_from(args).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(
            config.base_url.as_deref(),
            Some("http://localhost:8080/v1beta/")
        );
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.reveal_delay, Duration::ZERO);
        assert_eq!(config.replay_mode, ReplayMode::Live);
        assert_eq!(config.max_output_tokens, Some(512));
        assert!(!config.use_color);
    }

    #[test]
    fn config_from_args_rejects_bad_values() {
        let args = ChatArgs {
            replay: Some("sometimes".to_string()),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::try_from(args).is_err());

        let args = ChatArgs {
            probe_timeout_secs: Some(0),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::try_from(args).is_err());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Custom("tunedModels/support-bot".to_string()))
            .with_base_url(Some("https://proxy.example.com/".to_string()))
            .with_probe_timeout(Duration::from_secs(3))
            .with_reveal_delay(Duration::from_millis(10))
            .with_replay_mode(ReplayMode::Live)
            .without_color()
            .with_temperature(Some(0.4))
            .with_max_output_tokens(Some(1024));

        assert_eq!(
            config.model,
            Model::Custom("tunedModels/support-bot".to_string())
        );
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.reveal_delay, Duration::from_millis(10));
        assert_eq!(config.replay_mode, ReplayMode::Live);
        assert!(!config.use_color);
        assert_eq!(
            config.generation_config(),
            GenerationConfig {
                temperature: Some(0.4),
                max_output_tokens: Some(1024),
                ..GenerationConfig::default()
            }
        );
    }
}
