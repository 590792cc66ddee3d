//! OpenRouter gateway adapter.
//!
//! Implements the [`LlmProvider`] port against an OpenRouter-compatible
//! chat-completions endpoint. This is the only place in the engine that
//! knows the gateway's wire format.

use async_trait::async_trait;
use council_application::ports::provider::{
    Completion, CompletionRequest, LlmProvider, ProviderError,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// Default chat-completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default cap on concurrent in-flight requests.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 32;

/// Provider adapter speaking the OpenRouter chat-completions protocol.
///
/// The adapter owns bearer authorization, the base URL, the per-request
/// timeout, and an in-flight concurrency cap. The underlying connection
/// pool is safe under concurrent calls; the engine fans every generation
/// and review call through one shared instance.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    permits: Semaphore,
}

impl OpenRouterProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_options(
            api_key,
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_MAX_IN_FLIGHT,
        )
    }

    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        max_in_flight: usize,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            permits: Semaphore::new(max_in_flight.max(1)),
        }
    }

    fn map_send_error(error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Transient(error.to_string())
        }
    }

    /// Map an HTTP status to the error taxonomy: 429 and 5xx are transient
    /// (the gateway handles retries), any other 4xx is permanent with the
    /// body preserved for the per-role error field.
    fn map_status(status: u16, message: String) -> ProviderError {
        if status == 429 || status >= 500 {
            ProviderError::Transient(format!("gateway error {status}: {message}"))
        } else {
            ProviderError::Permanent { status, message }
        }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireReply,
}

#[derive(Deserialize)]
struct WireReply {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct WireUsage {
    total_tokens: Option<u32>,
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ProviderError::Transient("provider closed".to_string()))?;

        let started = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(WireMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: &request.user,
        });

        let body = WireRequest {
            model: request.model.as_str(),
            messages,
            temperature: request.sampling.temperature,
            max_tokens: request.sampling.max_tokens,
            top_p: request.sampling.top_p,
            presence_penalty: request.sampling.presence_penalty,
            frequency_penalty: request.sampling.frequency_penalty,
        };

        debug!("Calling {} via {}", request.model, self.base_url);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://github.com/llm-council/llm-council")
            .header("X-Title", "llm-council")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status.as_u16(), message));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transient(format!("invalid gateway response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(Completion {
            text,
            tokens_used: parsed.usage.and_then(|u| u.total_tokens),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn health_check(&self) -> bool {
        if self.api_key.is_empty() {
            return false;
        }
        match self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn close(&self) {
        // Stop admitting new requests; pooled connections close when the
        // client drops.
        self.permits.close();
    }
}
