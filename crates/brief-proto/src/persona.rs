//! Persona identifiers.
//!
//! A persona is the audience a report is written for. It selects the drafting
//! prompt, the judge prompt, and how much ticket detail the judge sees.

use serde::{Deserialize, Serialize};

/// Unique identifier for a persona, normalized to `snake_case`.
///
/// Display names are accepted on construction, so `"Team Lead"`,
/// `"team-lead"` and `"team_lead"` all name the same persona.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PersonaId(String);

impl PersonaId {
    /// Creates a new persona ID.
    pub fn new(id: impl AsRef<str>) -> Self {
        let normalized = id
            .as_ref()
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
            .collect::<String>()
            .to_lowercase();
        Self(normalized)
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PersonaId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PersonaId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PersonaId> for String {
    fn from(id: PersonaId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How much ticket detail goes into the judge's inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryDetail {
    /// Descriptions and the subtask hierarchy are included.
    Full,
    /// Identifier, summary, status, assignee and priority only.
    #[default]
    Summary,
}

impl InventoryDetail {
    pub fn as_str(self) -> &'static str {
        match self {
            InventoryDetail::Full => "full",
            InventoryDetail::Summary => "summary",
        }
    }
}
