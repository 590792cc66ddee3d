//! LLM provider port
//!
//! Defines the single capability the engine needs from a remote LLM
//! gateway: send a chat-style request, get back a text completion. The
//! adapter in the infrastructure layer is the only place that knows the
//! gateway's wire format.

use async_trait::async_trait;
use council_domain::{ModelId, SamplingParams};
use thiserror::Error;

/// Errors from provider operations.
///
/// The engine does not retry on its own; transient and permanent failures
/// degrade into failed answers or missing verdicts at the stage that
/// issued the call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Timeout, 5xx, or network failure at the gateway.
    #[error("Transient provider error: {0}")]
    Transient(String),

    /// Non-retryable gateway rejection (4xx other than rate limiting).
    #[error("Provider rejected the request ({status}): {message}")]
    Permanent { status: u16, message: String },

    /// The per-request deadline expired.
    #[error("Request timed out")]
    Timeout,

    /// The caller's cancellation signal fired while the call was in flight.
    #[error("Request cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Check if this error represents a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Cancelled)
    }
}

/// A chat-style completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: ModelId,
    /// System message; omitted from the wire request when `None`.
    pub system: Option<String>,
    pub user: String,
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    pub fn new(model: ModelId, user: impl Into<String>) -> Self {
        Self {
            model,
            system: None,
            user: user.into(),
            sampling: SamplingParams::default(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        if !system.is_empty() {
            self.system = Some(system);
        }
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }
}

/// A completed provider call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// The completion text (may be empty; the caller decides what that means)
    pub text: String,
    /// Total token usage, when the gateway reports it
    pub tokens_used: Option<u32>,
    /// Round-trip latency measured by the adapter
    pub latency_ms: u64,
}

/// Gateway capability for LLM completions.
///
/// Implementations must be safe under concurrent calls; the engine fans out
/// every generation and review call through one shared instance. The
/// adapter owns authorization, base URL, per-request timeout, and its own
/// in-flight concurrency cap.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Issue one completion call.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;

    /// Probe whether the gateway is reachable and authorized.
    async fn health_check(&self) -> bool {
        true
    }

    /// Release pooled connections. Calls after `close` are allowed to fail.
    async fn close(&self) {}
}
