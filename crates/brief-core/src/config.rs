//! Configuration for Brief.
//!
//! Loaded from `brief.yml` (or `--config`). Every section is optional and
//! falls back to defaults, so an empty file is a valid configuration.

use crate::inventory::DEFAULT_DESCRIPTION_MAX_CHARS;
use brief_proto::InventoryDetail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Standard configuration file names, checked in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["brief.yml", "brief.yaml"];

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    pub validation: ValidationSettings,
    pub drafter: LlmSettings,
    pub judge: LlmSettings,
    /// Per-persona overrides keyed by persona id.
    pub personas: BTreeMap<String, PersonaOverride>,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            validation: ValidationSettings::default(),
            drafter: LlmSettings::default(),
            judge: LlmSettings::judge_default(),
            personas: BTreeMap::new(),
        }
    }
}

impl BriefConfig {
    /// Loads configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parses configuration from YAML text.
    pub fn parse_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Loads the first standard config file found in `root`.
    ///
    /// Returns the path it came from, or `None` when `root` has no config file.
    pub fn discover(root: &Path) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        for name in CONFIG_FILE_NAMES {
            let path = root.join(name);
            if path.exists() {
                return Ok(Some((Self::from_file(&path)?, path)));
            }
        }
        Ok(None)
    }

    /// Checks configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "validation.max_attempts must be at least 1".to_string(),
            ));
        }

        for (section, settings) in [("drafter", &self.drafter), ("judge", &self.judge)] {
            if settings.model.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{section}.model must not be empty")));
            }
            if settings.max_tokens == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{section}.max_tokens must be at least 1"
                )));
            }
        }

        for (id, persona) in &self.personas {
            if let Some(template) = &persona.judge_prompt {
                for placeholder in ["{ticket_data}", "{summary_text}"] {
                    if !template.contains(placeholder) {
                        return Err(ConfigError::Invalid(format!(
                            "personas.{id}.judge_prompt is missing the {placeholder} placeholder"
                        )));
                    }
                }
            }
            if let Some(template) = &persona.draft_prompt
                && !template.contains("{tickets_text}")
            {
                return Err(ConfigError::Invalid(format!(
                    "personas.{id}.draft_prompt is missing the {{tickets_text}} placeholder"
                )));
            }
        }

        Ok(())
    }
}

/// Validation loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Hard ceiling on drafter/judge cycles.
    pub max_attempts: u32,
    /// Description cap for full-detail inventories.
    pub description_max_chars: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            description_max_chars: DEFAULT_DESCRIPTION_MAX_CHARS,
        }
    }
}

/// Supported chat-completions providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Groq,
    Xai,
}

impl LlmProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Xai => "xai",
        }
    }

    /// Chat-completions endpoint for the provider.
    pub fn default_api_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
            Self::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Self::Xai => "https://api.x.ai/v1/chat/completions",
        }
    }

    /// Environment variable conventionally holding the provider's key.
    pub fn default_api_key_env(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::Xai => "XAI_API_KEY",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for one LLM collaborator.
///
/// Fields omitted from a configured section take the drafter defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub model: String,
    /// Overrides the provider's chat-completions URL.
    pub api_url: Option<String>,
    /// Overrides the provider's API key variable.
    pub api_key_env: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            api_url: None,
            api_key_env: None,
            max_tokens: 400,
            temperature: 0.7,
            timeout_seconds: 30,
        }
    }
}

impl LlmSettings {
    /// Deterministic sampling with room for a full labeled verdict.
    pub fn judge_default() -> Self {
        Self {
            max_tokens: 600,
            temperature: 0.0,
            ..Self::default()
        }
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_url())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Per-persona overrides merged over the built-in catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaOverride {
    pub display_name: Option<String>,
    pub focus: Option<String>,
    pub detail: Option<InventoryDetail>,
    pub draft_prompt: Option<String>,
    pub judge_prompt: Option<String>,
    pub enabled: Option<bool>,
}
