//! File-based ticket source.
//!
//! Reads a ticket snapshot from JSON in one of two shapes:
//! - a native array of [`Ticket`] records
//! - a tracker REST search response: `{"issues": [{"key": .., "fields": {..}}]}`
//!
//! Fetching from a live tracker is left to whatever produced the file.

use brief_proto::Ticket;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a ticket snapshot.
#[derive(Debug, Error)]
pub enum TicketSourceError {
    #[error("failed to read tickets: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tickets: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ticket at position {index} has no key")]
    MissingKey { index: usize },

    #[error("duplicate ticket key '{0}'")]
    DuplicateKey(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TicketFile {
    Native(Vec<Ticket>),
    Search { issues: Vec<SearchIssue> },
}

#[derive(Debug, Deserialize)]
struct SearchIssue {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    fields: SearchFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchFields {
    summary: Option<String>,
    description: Option<Value>,
    status: Option<Named>,
    assignee: Option<Person>,
    priority: Option<Named>,
    parent: Option<KeyRef>,
    subtasks: Vec<KeyRef>,
    duedate: Option<String>,
    resolutiondate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Person {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeyRef {
    key: Option<String>,
}

/// Loads tickets from a JSON file.
pub fn load_tickets(path: &Path) -> Result<Vec<Ticket>, TicketSourceError> {
    let content = std::fs::read_to_string(path)?;
    let tickets = parse_tickets(&content)?;
    debug!(path = %path.display(), count = tickets.len(), "Loaded tickets");
    Ok(tickets)
}

/// Parses tickets from JSON text in either supported shape.
pub fn parse_tickets(content: &str) -> Result<Vec<Ticket>, TicketSourceError> {
    let tickets = match serde_json::from_str::<TicketFile>(content)? {
        TicketFile::Native(tickets) => tickets,
        TicketFile::Search { issues } => issues
            .into_iter()
            .enumerate()
            .map(|(index, issue)| issue.into_ticket(index))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let mut seen = HashSet::new();
    for ticket in &tickets {
        if !seen.insert(ticket.key.as_str()) {
            return Err(TicketSourceError::DuplicateKey(ticket.key.clone()));
        }
    }

    Ok(tickets)
}

impl SearchIssue {
    fn into_ticket(self, index: usize) -> Result<Ticket, TicketSourceError> {
        let key = self
            .key
            .filter(|k| !k.trim().is_empty())
            .ok_or(TicketSourceError::MissingKey { index })?;
        let fields = self.fields;

        let status = fields
            .status
            .and_then(|s| s.name)
            .unwrap_or_else(|| "N/A".to_string());

        let mut ticket = Ticket::new(key, fields.summary.unwrap_or_default(), status.as_str());
        ticket.assignee = fields.assignee.and_then(|a| a.display_name);
        ticket.priority = fields.priority.and_then(|p| p.name);
        ticket.description = fields
            .description
            .as_ref()
            .map(description_text)
            .filter(|d| !d.trim().is_empty());
        ticket.parent = fields.parent.and_then(|p| p.key);
        ticket.subtasks = fields.subtasks.into_iter().filter_map(|s| s.key).collect();
        ticket.due_date = fields.duedate;
        ticket.resolved = fields.resolutiondate;
        Ok(ticket)
    }
}

/// Flattens a description that is either plain text or a rich-text document.
fn description_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            let mut parts = Vec::new();
            collect_text(value, &mut parts);
            parts.join(" ")
        }
        _ => String::new(),
    }
}

fn collect_text<'a>(value: &'a Value, parts: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                parts.push(text);
            }
            if let Some(content) = map.get("content") {
                collect_text(content, parts);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, parts);
            }
        }
        _ => {}
    }
}
