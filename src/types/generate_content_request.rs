use serde::{Deserialize, Serialize};

use crate::types::Content;

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// True when no field is set, in which case the config is omitted.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
            && self.max_output_tokens.is_none()
    }
}

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Full conversation history, oldest first, ending with the new prompt.
    pub contents: Vec<Content>,

    /// Optional sampling parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a request from conversation contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            generation_config: None,
        }
    }

    /// Attach a generation config; empty configs are dropped.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = if config.is_empty() {
            None
        } else {
            Some(config)
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_without_config() {
        let request = GenerateContentRequest::new(vec![Content::user("Connection test")])
            .with_generation_config(GenerationConfig::default());
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "Connection test"}]}]})
        );
    }

    #[test]
    fn request_with_config_is_camel_case() {
        let request = GenerateContentRequest::new(vec![Content::user("hi")]).with_generation_config(
            GenerationConfig {
                temperature: Some(0.5),
                max_output_tokens: Some(256),
                ..GenerationConfig::default()
            },
        );
        let value = to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"],
            json!({"temperature": 0.5, "maxOutputTokens": 256})
        );
    }
}
