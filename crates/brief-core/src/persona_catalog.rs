//! Persona catalog: who a report is for, and which prompts produce and check it.
//!
//! The catalog manages both built-in personas (compiled into the binary) and
//! per-persona overrides from configuration. Adding a persona is a config
//! change: an override for an unknown id with both prompts defines a new one.

use crate::config::{BriefConfig, ConfigError, PersonaOverride};
use crate::validation_loop::ValidationError;
use brief_proto::{InventoryDetail, PersonaId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Built-in persona definitions.
const BUILTIN_PERSONAS_RAW: &str = include_str!("../data/personas.yml");

/// One report audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub id: PersonaId,
    pub display_name: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub detail: InventoryDetail,
    /// Drafting prompt; `{tickets_text}` receives the ticket listing and
    /// `{policy}` the grounding rules.
    pub draft_prompt: String,
    /// Judge template; `{ticket_data}`, `{summary_text}`, `{ticket_count}`
    /// and `{persona}` are filled per attempt.
    pub judge_prompt: String,
}

/// Ordered collection of enabled personas.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<PersonaProfile>,
}

impl PersonaCatalog {
    /// Loads the built-in catalog.
    pub fn builtin() -> Result<Self, ConfigError> {
        let personas: Vec<PersonaProfile> = serde_yaml::from_str(BUILTIN_PERSONAS_RAW)?;
        Ok(Self { personas })
    }

    /// Builds the catalog from built-ins plus configured overrides.
    pub fn from_config(config: &BriefConfig) -> Result<Self, ConfigError> {
        let mut catalog = Self::builtin()?;
        for (id, overrides) in &config.personas {
            catalog.apply_override(&PersonaId::new(id), overrides)?;
        }
        Ok(catalog)
    }

    fn apply_override(
        &mut self,
        id: &PersonaId,
        overrides: &PersonaOverride,
    ) -> Result<(), ConfigError> {
        if overrides.enabled == Some(false) {
            debug!(persona = %id, "Persona disabled by config");
            self.personas.retain(|p| &p.id != id);
            return Ok(());
        }

        if let Some(profile) = self.personas.iter_mut().find(|p| &p.id == id) {
            if let Some(display_name) = &overrides.display_name {
                profile.display_name.clone_from(display_name);
            }
            if let Some(focus) = &overrides.focus {
                profile.focus.clone_from(focus);
            }
            if let Some(detail) = overrides.detail {
                profile.detail = detail;
            }
            if let Some(prompt) = &overrides.draft_prompt {
                profile.draft_prompt.clone_from(prompt);
            }
            if let Some(prompt) = &overrides.judge_prompt {
                profile.judge_prompt.clone_from(prompt);
            }
            debug!(persona = %id, "Applied persona override");
            return Ok(());
        }

        let (Some(draft_prompt), Some(judge_prompt)) =
            (&overrides.draft_prompt, &overrides.judge_prompt)
        else {
            return Err(ConfigError::Invalid(format!(
                "persona '{id}' is not built in and needs both draft_prompt and judge_prompt"
            )));
        };

        self.personas.push(PersonaProfile {
            id: id.clone(),
            display_name: overrides
                .display_name
                .clone()
                .unwrap_or_else(|| id.to_string()),
            focus: overrides.focus.clone().unwrap_or_default(),
            detail: overrides.detail.unwrap_or_default(),
            draft_prompt: draft_prompt.clone(),
            judge_prompt: judge_prompt.clone(),
        });
        debug!(persona = %id, "Registered configured persona");
        Ok(())
    }

    /// Looks up a persona by id or display name ("Team Lead" finds `team_lead`).
    pub fn get(&self, name: &str) -> Option<&PersonaProfile> {
        let wanted = PersonaId::new(name);
        self.personas
            .iter()
            .find(|p| p.id == wanted || PersonaId::new(&p.display_name) == wanted)
    }

    /// Like [`get`](Self::get), failing for unknown or disabled personas.
    pub fn require(&self, name: &str) -> Result<&PersonaProfile, ValidationError> {
        self.get(name)
            .ok_or_else(|| ValidationError::UnknownPersona(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaProfile> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}
