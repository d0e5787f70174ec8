//! Assistant configuration and credentials

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-5-nano";

/// Default OpenAI-compatible API root
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Settings for talking to the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Model name sent with every request
    pub model: String,

    /// API root; `/chat/completions` is appended
    pub api_base: String,

    /// Sampling temperature, left to the provider default when unset
    pub temperature: Option<f32>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: None,
        }
    }
}

impl AssistantConfig {
    /// Defaults, overridden by `OPENAI_MODEL` and `OPENAI_API_BASE` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            if !base.trim().is_empty() {
                config.api_base = base;
            }
        }
        config
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// API key held in memory for the session only
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for empty or whitespace-only input
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Read `OPENAI_API_KEY`
    pub fn from_env() -> Option<Self> {
        std::env::var("OPENAI_API_KEY").ok().and_then(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
