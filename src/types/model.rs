use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a Gemini model identifier.
///
/// This can be a predefined model name or a custom string value for models
/// that are not listed in [`KnownModel`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for newer or tuned models)
    Custom(String),
}

/// Known Gemini model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Gemini 1.5 Flash (latest alias)
    #[serde(rename = "gemini-1.5-flash-latest")]
    Gemini15FlashLatest,

    /// Gemini 1.5 Flash
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,

    /// Gemini 1.5 Pro (latest alias)
    #[serde(rename = "gemini-1.5-pro-latest")]
    Gemini15ProLatest,

    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,

    /// Gemini 2.5 Flash
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,

    /// Gemini 2.5 Pro
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
}

impl KnownModel {
    /// Every known model, in declaration order.
    pub const ALL: [KnownModel; 6] = [
        KnownModel::Gemini15FlashLatest,
        KnownModel::Gemini15Flash,
        KnownModel::Gemini15ProLatest,
        KnownModel::Gemini20Flash,
        KnownModel::Gemini25Flash,
        KnownModel::Gemini25Pro,
    ];

    /// The name used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Gemini15FlashLatest => "gemini-1.5-flash-latest",
            KnownModel::Gemini15Flash => "gemini-1.5-flash",
            KnownModel::Gemini15ProLatest => "gemini-1.5-pro-latest",
            KnownModel::Gemini20Flash => "gemini-2.0-flash",
            KnownModel::Gemini25Flash => "gemini-2.5-flash",
            KnownModel::Gemini25Pro => "gemini-2.5-pro",
        }
    }
}

impl Model {
    /// The resource path used in request URLs.
    ///
    /// Bare names live under `models/`; names that already carry a collection,
    /// such as `tunedModels/my-model`, are used as they are.
    pub fn resource_name(&self) -> String {
        match self {
            Model::Known(known) => format!("models/{known}"),
            Model::Custom(name) if name.contains('/') => name.clone(),
            Model::Custom(name) => format!("models/{name}"),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Gemini15FlashLatest)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = Infallible;

    /// Parses a model name; anything unrecognized becomes [`Model::Custom`].
    ///
    /// A leading `models/` prefix, as returned by the API's model listing, is
    /// accepted and stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("models/").unwrap_or(name);
        Ok(KnownModel::ALL
            .iter()
            .find(|known| known.as_str() == name)
            .map(|known| Model::Known(*known))
            .unwrap_or_else(|| Model::Custom(name.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::from(model.as_str())
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        match model.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}
