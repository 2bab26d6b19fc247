//! Ticket tables and the ticket listing handed to the drafting model.

use brief_core::truncate_with_ellipsis;
use brief_proto::{ReportTable, Ticket};

/// Columns of the all-tickets table.
pub const PRIMARY_COLUMNS: [&str; 6] = [
    "Key", "Summary", "Status", "Assignee", "Priority", "Due Date",
];

/// Columns of the open-work table.
pub const SECONDARY_COLUMNS: [&str; 4] = ["Key", "Summary", "Status", "Priority"];

const LISTING_DESCRIPTION_MAX: usize = 200;

/// Builds the all-tickets table in input order.
pub fn primary_table(tickets: &[Ticket]) -> ReportTable {
    let mut table = ReportTable::new(PRIMARY_COLUMNS);
    for ticket in tickets {
        table.push_row([
            ticket.key.as_str(),
            ticket.summary.as_str(),
            ticket.status.as_str(),
            ticket.assignee_or_default(),
            ticket.priority_or_default(),
            ticket.due_date.as_deref().unwrap_or(""),
        ]);
    }
    table
}

/// Builds the table of tickets that are not done.
pub fn secondary_table(tickets: &[Ticket]) -> ReportTable {
    let mut table = ReportTable::new(SECONDARY_COLUMNS);
    for ticket in tickets.iter().filter(|t| !t.status.is_done()) {
        table.push_row([
            ticket.key.as_str(),
            ticket.summary.as_str(),
            ticket.status.as_str(),
            ticket.priority_or_default(),
        ]);
    }
    table
}

/// Formats tickets for a drafting prompt's `{tickets_text}` slot.
pub fn tickets_text(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "(no tickets)".to_string();
    }

    let mut text = String::new();
    for ticket in tickets {
        text.push_str(&format!(
            "- {}: {} (Status: {}; Assignee: {}; Priority: {}",
            ticket.key,
            ticket.summary.trim(),
            ticket.status,
            ticket.assignee_or_default(),
            ticket.priority_or_default()
        ));
        if let Some(due) = &ticket.due_date {
            text.push_str(&format!("; Due: {due}"));
        }
        if let Some(parent) = &ticket.parent {
            text.push_str(&format!("; Parent: {parent}"));
        }
        text.push_str(")\n");

        if let Some(description) = ticket.description.as_deref() {
            let description = description.split_whitespace().collect::<Vec<_>>().join(" ");
            if !description.is_empty() {
                text.push_str(&format!(
                    "  {}\n",
                    truncate_with_ellipsis(&description, LISTING_DESCRIPTION_MAX)
                ));
            }
        }
    }
    text
}
