//! Tabular views produced alongside a drafted report.

use serde::{Deserialize, Serialize};

/// A simple string table with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table as a GitHub-flavored markdown table.
    ///
    /// Pipe characters inside cells are escaped.
    pub fn to_markdown(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let escape = |cell: &str| cell.replace('|', "\\|").replace('\n', " ");
        let mut out = String::new();

        out.push_str("| ");
        out.push_str(
            &self
                .columns
                .iter()
                .map(|c| escape(c))
                .collect::<Vec<_>>()
                .join(" | "),
        );
        out.push_str(" |\n|");
        out.push_str(&" --- |".repeat(self.columns.len()));
        out.push('\n');

        for row in &self.rows {
            out.push_str("| ");
            out.push_str(&row.iter().map(|c| escape(c)).collect::<Vec<_>>().join(" | "));
            out.push_str(" |\n");
        }

        out
    }
}

/// One drafted report: narrative text plus two derived tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub report: String,
    pub primary: ReportTable,
    pub secondary: ReportTable,
}

impl Draft {
    /// Creates a draft with empty tables.
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            primary: ReportTable::default(),
            secondary: ReportTable::default(),
        }
    }

    #[must_use]
    pub fn with_tables(mut self, primary: ReportTable, secondary: ReportTable) -> Self {
        self.primary = primary;
        self.secondary = secondary;
        self
    }
}
