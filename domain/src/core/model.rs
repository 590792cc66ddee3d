//! Model identifier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Identifier of an LLM model at the gateway (Value Object)
///
/// The engine is gateway-agnostic: a model id is an opaque string such as
/// `anthropic/claude-sonnet-4` that the provider adapter forwards verbatim.
/// The only invariant is that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new model id.
    ///
    /// # Panics
    /// Panics if the id is empty or only whitespace.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.trim().is_empty(), "Model id cannot be empty");
        Self(id)
    }

    /// Try to create a model id, returning `None` if invalid.
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() { None } else { Some(Self(id)) }
    }

    /// Get the string identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::try_new(s).ok_or_else(|| DomainError::InvalidModel(s.to_string()))
    }
}
