//! Delivery metrics computed straight from the ticket snapshot.

use brief_proto::Ticket;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Counts shown in every report, independent of the drafted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub total: usize,
    pub completed: usize,
    /// Not done, with a due date before the reference date.
    pub overdue: usize,
}

impl ReportMetrics {
    /// Computes metrics for `tickets` as of `today`.
    ///
    /// Due dates are read from their leading `YYYY-MM-DD`; anything else is
    /// not counted as overdue.
    pub fn compute(tickets: &[Ticket], today: NaiveDate) -> Self {
        let completed = tickets.iter().filter(|t| t.status.is_done()).count();
        let overdue = tickets
            .iter()
            .filter(|t| !t.status.is_done())
            .filter_map(|t| t.due_date.as_deref().and_then(parse_due_date))
            .filter(|due| *due < today)
            .count();

        Self {
            total: tickets.len(),
            completed,
            overdue,
        }
    }

    /// Completed share in whole percent; 0 for an empty snapshot.
    pub fn completion_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let percent = (self.completed as f64 / self.total as f64 * 100.0).round();
        percent as u32
    }

    pub fn to_markdown(&self) -> String {
        format!(
            "- **Total issues:** {}\n- **Completed:** {} ({}%)\n- **Overdue:** {}\n",
            self.total,
            self.completed,
            self.completion_percent(),
            self.overdue
        )
    }
}

fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
