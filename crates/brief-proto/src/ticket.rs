//! Ticket records consumed by report generation.

use serde::{Deserialize, Serialize};

/// Workflow status of a ticket.
///
/// The three common tracker states get their own variants; anything else
/// the tracker defines is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Done,
    InProgress,
    ToDo,
    Other(String),
}

impl TicketStatus {
    /// Returns the status name as shown by the tracker.
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Done => "Done",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::ToDo => "To Do",
            TicketStatus::Other(name) => name,
        }
    }

    /// Returns true if the ticket is finished.
    pub fn is_done(&self) -> bool {
        matches!(self, TicketStatus::Done)
    }
}

impl From<&str> for TicketStatus {
    fn from(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "done" => TicketStatus::Done,
            "inprogress" => TicketStatus::InProgress,
            "todo" => TicketStatus::ToDo,
            _ => TicketStatus::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of one issue-tracker ticket.
///
/// Tickets are owned by the caller and treated as immutable for the
/// duration of a report generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique tracker identifier (e.g. `AWS-123`).
    pub key: String,

    pub summary: String,

    pub status: TicketStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Identifier of the parent ticket, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Identifiers of subtasks, in tracker order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<String>,

    /// Due date as reported by the tracker (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Resolution timestamp as reported by the tracker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
}

impl Ticket {
    /// Creates a ticket with the required fields set.
    pub fn new(
        key: impl Into<String>,
        summary: impl Into<String>,
        status: impl Into<TicketStatus>,
    ) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            status: status.into(),
            assignee: None,
            priority: None,
            description: None,
            parent: None,
            subtasks: Vec::new(),
            due_date: None,
            resolved: None,
        }
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Adds a subtask reference.
    #[must_use]
    pub fn with_subtask(mut self, key: impl Into<String>) -> Self {
        self.subtasks.push(key.into());
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Returns the assignee or `"Unassigned"`.
    pub fn assignee_or_default(&self) -> &str {
        self.assignee.as_deref().unwrap_or("Unassigned")
    }

    /// Returns the priority or `"N/A"`.
    pub fn priority_or_default(&self) -> &str {
        self.priority.as_deref().unwrap_or("N/A")
    }
}
