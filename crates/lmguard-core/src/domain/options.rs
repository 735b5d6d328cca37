//! Per-session and per-prompt options.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::ChatMessage;

/// Configuration for a new session.
///
/// Sampling parameters and `extra` are passed to the host untouched; only
/// `initial_prompts` is rewritten when the instance carries a system prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Ordered messages the conversation starts from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initial_prompts: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Any other host-recognized configuration.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionOptions {
    #[must_use]
    pub fn with_initial_prompts(mut self, prompts: Vec<ChatMessage>) -> Self {
        self.initial_prompts = prompts;
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Options for a single prompt call.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    /// Caller-owned cancellation signal.
    pub signal: Option<CancellationToken>,

    /// Schema constraining the shape of the generated output.
    pub response_constraint: Option<Value>,
}

impl PromptOptions {
    #[must_use]
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    #[must_use]
    pub fn with_response_constraint(mut self, schema: Value) -> Self {
        self.response_constraint = Some(schema);
        self
    }
}
