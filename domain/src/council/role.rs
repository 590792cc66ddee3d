//! Council roles and per-role sampling parameters.

use crate::core::error::DomainError;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// Sampling parameters forwarded to the provider for a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f64,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Presence penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Frequency penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }
}

impl SamplingParams {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sampling used for judge calls during peer review.
    ///
    /// Low temperature keeps verdicts stable; the reply only needs enough
    /// room for a short rationale plus the verdict token.
    pub fn for_review() -> Self {
        Self::default().with_temperature(0.3).with_max_tokens(500)
    }

    /// Sampling used for the chairman synthesis call.
    pub fn for_synthesis() -> Self {
        Self::default().with_temperature(0.7).with_max_tokens(4000)
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::InvalidSampling(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == Some(0) {
            return Err(DomainError::InvalidSampling(
                "max_tokens must be positive".to_string(),
            ));
        }
        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(DomainError::InvalidSampling(format!(
                    "top_p must be between 0.0 and 1.0, got {top_p}"
                )));
            }
        }
        for (name, value) in [
            ("presence_penalty", self.presence_penalty),
            ("frequency_penalty", self.frequency_penalty),
        ] {
            if let Some(v) = value {
                if !(-2.0..=2.0).contains(&v) {
                    return Err(DomainError::InvalidSampling(format!(
                        "{name} must be between -2.0 and 2.0, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One seat at the council (Value Object)
///
/// A role binds a display name, a system prompt describing its perspective,
/// the model that answers for it, and sampling parameters. Names must be
/// unique within a deliberation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique name of this seat within a deliberation
    pub name: String,
    /// System prompt defining the role's perspective (may be empty, in which
    /// case the seat's identity is the model alone)
    #[serde(default)]
    pub system_prompt: String,
    /// Model that answers for this seat
    pub model: ModelId,
    /// Sampling parameters for this seat's generation call
    #[serde(default)]
    pub sampling: SamplingParams,
    /// Seat weight. Carried through to the output for callers that weight
    /// seats themselves; the built-in aggregators do not read it.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Role {
    pub fn new(name: impl Into<String>, model: ModelId) -> Self {
        Self {
            name: name.into(),
            system_prompt: String::new(),
            model,
            sampling: SamplingParams::default(),
            weight: 1.0,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Validate this role's configuration.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidRole("name cannot be empty".to_string()));
        }
        if self.weight <= 0.0 {
            return Err(DomainError::InvalidRole(format!(
                "weight must be positive, got {}",
                self.weight
            )));
        }
        self.sampling.validate()
    }

    /// Built-in role presets with ready-made perspectives.
    ///
    /// Returns `None` for unknown preset names.
    pub fn preset(name: &str, model: ModelId) -> Option<Role> {
        let prompt = match name {
            "advocate" => {
                "You argue the strongest constructive case for the proposal under discussion. \
                 Highlight benefits, opportunities, and reasons to proceed."
            }
            "critic" => {
                "You are a skeptical critic who challenges assumptions, identifies risks, \
                 and surfaces weaknesses the other perspectives may have missed."
            }
            "synthesizer" => {
                "You weigh trade-offs even-handedly and look for the position that best \
                 reconciles the competing concerns."
            }
            "pragmatist" => {
                "You focus on what can actually be executed: costs, timelines, operational \
                 constraints, and the simplest workable path."
            }
            "researcher" => {
                "You ground the discussion in evidence: state what is known, flag claims \
                 that would need verification, and keep fact separate from speculation."
            }
            _ => return None,
        };
        Some(Role::new(name, model).with_system_prompt(prompt))
    }
}
