use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Content;

/// One generated candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content; absent when generation was stopped early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped, e.g. `STOP`, `MAX_TOKENS` or `SAFETY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// Index of the candidate in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked and no candidates were produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token accounting for a single call.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the request contents.
    #[serde(default)]
    pub prompt_token_count: u32,

    /// Tokens across the generated candidates.
    #[serde(default)]
    pub candidates_token_count: u32,

    /// Total tokens billed for the call.
    #[serde(default)]
    pub total_token_count: u32,
}

/// Response of a `generateContent` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; usually exactly one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Prompt feedback, present when the prompt was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// Exact model version that served the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Returns the text of the first candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResponse`] when the prompt was blocked or the
    /// first candidate carries no text.
    pub fn text(&self) -> Result<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(Error::empty_response(format!(
                "prompt was blocked ({reason})"
            )));
        }
        let Some(candidate) = self.candidates.first() else {
            return Err(Error::empty_response("no candidates returned"));
        };
        let text = candidate
            .content
            .as_ref()
            .map(Content::text)
            .unwrap_or_default();
        if text.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("UNKNOWN");
            return Err(Error::empty_response(format!(
                "candidate contained no text (finish reason: {reason})"
            )));
        }
        Ok(text)
    }
}
