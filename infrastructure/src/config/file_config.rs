//! TOML file configuration schema.
//!
//! `FileConfig` is the serde image of `council.toml`. Conversion into
//! domain types happens through the `to_*` helpers so the binary stays a
//! thin wiring layer.

use council_domain::{
    AggregationMethod, CouncilOptions, ModelId, OutputMode, Role, SamplingParams, ValidationIssue,
};
use serde::{Deserialize, Serialize};

/// Root of the TOML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub council: FileCouncilConfig,
}

/// `[provider]` section: gateway endpoint and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Chat-completions base URL
    pub base_url: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    /// Per-request deadline in seconds
    pub timeout_secs: u64,
    /// Cap on concurrent in-flight requests
    pub max_in_flight: usize,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: crate::providers::openrouter::DEFAULT_BASE_URL.to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: 120,
            max_in_flight: 32,
        }
    }
}

/// `[council]` section: seats and deliberation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Seats, one `[[council.roles]]` table each
    pub roles: Vec<FileRoleConfig>,
    /// Chairman model for synthesis
    pub chairman: Option<String>,
    /// "perspectives", "synthesis", or "both"
    pub output_mode: String,
    /// Primary aggregation method: "borda", "bradley_terry", or "elo"
    pub aggregation: String,
    pub anonymize: bool,
    pub review: bool,
    /// Optional subset of role names acting as judges
    pub reviewers: Option<Vec<String>>,
    /// Overall deliberation deadline in seconds
    pub deadline_secs: u64,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            roles: Vec::new(),
            chairman: None,
            output_mode: "both".to_string(),
            aggregation: "borda".to_string(),
            anonymize: true,
            review: true,
            reviewers: None,
            deadline_secs: 600,
        }
    }
}

/// One `[[council.roles]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRoleConfig {
    pub name: String,
    pub model: String,
    /// Explicit system prompt; overrides `preset` when both are set
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Built-in preset name (advocate, critic, synthesizer, pragmatist,
    /// researcher)
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl FileRoleConfig {
    /// Convert into a domain role.
    pub fn to_role(&self) -> Result<Role, String> {
        let model = ModelId::try_new(self.model.clone())
            .ok_or_else(|| format!("role '{}' has an empty model id", self.name))?;

        let mut role = match self.preset.as_deref() {
            Some(preset) => Role::preset(preset, model.clone())
                .ok_or_else(|| format!("role '{}' uses unknown preset '{preset}'", self.name))?,
            None => Role::new(self.name.clone(), model.clone()),
        };
        role.name = self.name.clone();
        role.model = model;

        if let Some(prompt) = &self.system_prompt {
            role.system_prompt = prompt.clone();
        }
        let mut sampling = SamplingParams::default();
        if let Some(temperature) = self.temperature {
            sampling.temperature = temperature;
        }
        sampling.max_tokens = self.max_tokens;
        sampling.top_p = self.top_p;
        role.sampling = sampling;
        if let Some(weight) = self.weight {
            role.weight = weight;
        }

        role.validate().map_err(|e| e.to_string())?;
        Ok(role)
    }
}

impl FileCouncilConfig {
    /// Convert the seats into domain roles, collecting per-role errors.
    pub fn to_roles(&self) -> Result<Vec<Role>, String> {
        self.roles.iter().map(|r| r.to_role()).collect()
    }

    /// Convert the option fields into [`CouncilOptions`]. Invalid enum
    /// values fall back to defaults; `validate` reports them.
    pub fn to_options(&self) -> CouncilOptions {
        CouncilOptions {
            output_mode: self.output_mode.parse::<OutputMode>().unwrap_or_default(),
            anonymize: self.anonymize,
            review: self.review,
            reviewers: self.reviewers.clone(),
            aggregation: self
                .aggregation
                .parse::<AggregationMethod>()
                .unwrap_or_default(),
            chairman_model: self
                .chairman
                .as_ref()
                .and_then(|c| ModelId::try_new(c.clone())),
        }
    }
}

impl FileConfig {
    /// Validate the configuration, returning warnings and errors to surface
    /// before a run.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.council.output_mode.parse::<OutputMode>().is_err() {
            issues.push(ValidationIssue::error(format!(
                "invalid council.output_mode '{}'",
                self.council.output_mode
            )));
        }
        if self.council.aggregation.parse::<AggregationMethod>().is_err() {
            issues.push(ValidationIssue::error(format!(
                "invalid council.aggregation '{}'",
                self.council.aggregation
            )));
        }
        if self.provider.timeout_secs == 0 {
            issues.push(ValidationIssue::error(
                "provider.timeout_secs must be positive",
            ));
        }
        if self.provider.max_in_flight == 0 {
            issues.push(ValidationIssue::warning(
                "provider.max_in_flight of 0 is treated as 1",
            ));
        }

        let mut names = std::collections::BTreeSet::new();
        for role in &self.council.roles {
            if !names.insert(role.name.as_str()) {
                issues.push(ValidationIssue::error(format!(
                    "duplicate role name '{}'",
                    role.name
                )));
            }
            if let Err(e) = role.to_role() {
                issues.push(ValidationIssue::error(e));
            }
        }

        if let Some(reviewers) = &self.council.reviewers {
            for reviewer in reviewers {
                if !self.council.roles.iter().any(|r| &r.name == reviewer) {
                    issues.push(ValidationIssue::warning(format!(
                        "reviewer '{reviewer}' does not match any configured role"
                    )));
                }
            }
        }

        issues
    }
}
