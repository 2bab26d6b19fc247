//! Ticket inventory formatting for the judge.
//!
//! The inventory is the judge's ground truth: a compact, deterministic
//! listing of the ticket snapshot that claims in a report can be checked
//! against. Every input ticket appears exactly once as an entry line and no
//! identifier outside the snapshot is ever written.
//!
//! ```text
//! TICKET INVENTORY
//! Persona: team_lead
//! Detail: full
//! Total tickets: 2 (Done: 1, Not done: 1)
//!
//! - AWS-1 | Migrate VPC | Status: Done | Assignee: Jane | Priority: High
//!   Description: Move the VPC to the new account.
//!   - AWS-2 | Update routes | Status: To Do | Assignee: Unassigned | Priority: N/A
//! ```

use crate::text::{collapse_whitespace, truncate_with_ellipsis};
use brief_proto::{InventoryDetail, PersonaId, Ticket};
use std::collections::HashMap;

/// Default cap on description length in full-detail inventories.
pub const DEFAULT_DESCRIPTION_MAX_CHARS: usize = 300;

/// Nesting deeper than this is written at this indentation.
const MAX_INDENT_DEPTH: usize = 8;

/// A formatted, read-only ticket inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketInventory {
    text: String,
    ticket_count: usize,
}

impl TicketInventory {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn ticket_count(&self) -> usize {
        self.ticket_count
    }
}

impl std::fmt::Display for TicketInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Formats ticket snapshots into judge-readable inventories.
#[derive(Debug, Clone)]
pub struct InventoryFormatter {
    description_max_chars: usize,
}

impl Default for InventoryFormatter {
    fn default() -> Self {
        Self {
            description_max_chars: DEFAULT_DESCRIPTION_MAX_CHARS,
        }
    }
}

impl InventoryFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum description length for full-detail inventories.
    #[must_use]
    pub fn with_description_limit(mut self, max_chars: usize) -> Self {
        self.description_max_chars = max_chars;
        self
    }

    /// Formats `tickets` for the given persona.
    ///
    /// Pure function of its inputs: the same tickets, persona and detail level
    /// always produce byte-identical text.
    pub fn format(
        &self,
        tickets: &[Ticket],
        persona: &PersonaId,
        detail: InventoryDetail,
    ) -> TicketInventory {
        let done = tickets.iter().filter(|t| t.status.is_done()).count();

        let mut text = String::new();
        text.push_str("TICKET INVENTORY\n");
        text.push_str(&format!("Persona: {}\n", persona));
        text.push_str(&format!("Detail: {}\n", detail.as_str()));
        text.push_str(&format!(
            "Total tickets: {} (Done: {}, Not done: {})\n\n",
            tickets.len(),
            done,
            tickets.len() - done
        ));

        if tickets.is_empty() {
            text.push_str("(no tickets in scope)\n");
        } else {
            match detail {
                InventoryDetail::Full => self.write_hierarchy(&mut text, tickets),
                InventoryDetail::Summary => {
                    for ticket in tickets {
                        write_entry(&mut text, ticket, 0);
                    }
                }
            }
        }

        TicketInventory {
            text,
            ticket_count: tickets.len(),
        }
    }

    /// Writes tickets as a parent/subtask tree, each ticket exactly once.
    fn write_hierarchy(&self, out: &mut String, tickets: &[Ticket]) {
        let index: HashMap<&str, usize> = tickets
            .iter()
            .enumerate()
            .map(|(i, t)| (t.key.as_str(), i))
            .collect();

        let mut claimed: Vec<Option<usize>> = vec![None; tickets.len()];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); tickets.len()];

        // Subtask lists claim children first, in tracker order.
        for (i, ticket) in tickets.iter().enumerate() {
            for sub in &ticket.subtasks {
                if let Some(&j) = index.get(sub.as_str())
                    && j != i
                    && claimed[j].is_none()
                {
                    claimed[j] = Some(i);
                    children[i].push(j);
                }
            }
        }

        // Parent references pick up anything the subtask lists missed.
        for (j, ticket) in tickets.iter().enumerate() {
            if claimed[j].is_some() {
                continue;
            }
            if let Some(parent) = &ticket.parent
                && let Some(&p) = index.get(parent.as_str())
                && p != j
            {
                claimed[j] = Some(p);
                children[p].push(j);
            }
        }

        let mut visited = vec![false; tickets.len()];
        let roots: Vec<usize> = (0..tickets.len()).filter(|&i| claimed[i].is_none()).collect();
        for root in roots {
            self.write_subtree(out, tickets, &index, &children, &mut visited, root);
        }

        // Reference cycles leave tickets without a root; list them at top level.
        for i in 0..tickets.len() {
            if !visited[i] {
                self.write_subtree(out, tickets, &index, &children, &mut visited, i);
            }
        }
    }

    /// Writes `root` and its descendants in pre-order.
    ///
    /// Walks with an explicit stack; parent chains can be arbitrarily long.
    fn write_subtree(
        &self,
        out: &mut String,
        tickets: &[Ticket],
        index: &HashMap<&str, usize>,
        children: &[Vec<usize>],
        visited: &mut [bool],
        root: usize,
    ) {
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some((node, depth)) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;

            let ticket = &tickets[node];
            let depth = depth.min(MAX_INDENT_DEPTH);
            write_entry(out, ticket, depth);

            let pad = "  ".repeat(depth + 1);
            if let Some(description) = ticket.description.as_deref() {
                let description = collapse_whitespace(description);
                if !description.is_empty() {
                    out.push_str(&format!(
                        "{pad}Description: {}\n",
                        truncate_with_ellipsis(&description, self.description_max_chars)
                    ));
                }
            }

            let outside = ticket
                .subtasks
                .iter()
                .filter(|key| !index.contains_key(key.as_str()))
                .count();
            if outside > 0 {
                out.push_str(&format!("{pad}Subtasks outside inventory: {outside}\n"));
            }

            // Reversed so the first child is popped first.
            for &child in children[node].iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
}

fn write_entry(out: &mut String, ticket: &Ticket, depth: usize) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!(
        "- {} | {} | Status: {} | Assignee: {} | Priority: {}",
        ticket.key,
        collapse_whitespace(&ticket.summary),
        ticket.status,
        ticket.assignee_or_default(),
        ticket.priority_or_default(),
    ));
    if let Some(due) = &ticket.due_date {
        out.push_str(&format!(" | Due: {due}"));
    }
    out.push('\n');
}
