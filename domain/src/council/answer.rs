//! Answer value object produced by the generation stage.

use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// One role's response from the generation stage.
///
/// Every role produces exactly one answer per deliberation, possibly a
/// failure stub. The answer list preserves the input role order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Name of the owning role
    pub role: String,
    /// Model that produced (or failed to produce) the answer
    pub model: ModelId,
    /// The response text (empty on failure)
    pub content: String,
    /// Whether the generation call succeeded with non-empty text
    pub success: bool,
    /// Error description if the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Token usage reported by the provider, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    /// End-to-end latency of the generation call in milliseconds
    pub latency_ms: u64,
}

impl Answer {
    /// Creates a successful answer.
    pub fn success(role: impl Into<String>, model: ModelId, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            model,
            content: content.into(),
            success: true,
            error: None,
            tokens_used: None,
            latency_ms: 0,
        }
    }

    /// Creates a failure stub for a role whose call did not produce text.
    pub fn failure(role: impl Into<String>, model: ModelId, error: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            model,
            content: String::new(),
            success: false,
            error: Some(error.into()),
            tokens_used: None,
            latency_ms: 0,
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    /// Returns `true` if this answer is a usable candidate for review.
    pub fn is_success(&self) -> bool {
        self.success
    }
}
