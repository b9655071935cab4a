//! The query/filter engine. Read-only projections over a table snapshot.
//!
//! RULE: Nothing here mutates a record. A View is a copy of the matching
//! records plus their positions in the table they came from.

use crate::{
    error::{LedgerError, LedgerResult},
    record::FeeRecord,
    types::RecordIndex,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRow {
    /// Position of the record in the underlying table.
    pub index: RecordIndex,
    pub record: FeeRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub rows: Vec<ViewRow>,
}

impl View {
    /// A view that shows the whole table.
    pub fn all(records: &[FeeRecord]) -> Self {
        Self::matching(records, |_| true)
    }

    fn matching(records: &[FeeRecord], mut keep: impl FnMut(&FeeRecord) -> bool) -> Self {
        let rows = records
            .iter()
            .enumerate()
            .filter(|(_, r)| keep(r))
            .map(|(index, r)| ViewRow {
                index,
                record: r.clone(),
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &FeeRecord> {
        self.rows.iter().map(|r| &r.record)
    }

    /// Map a position in this view back to the table index it shows.
    pub fn table_index(&self, view_position: usize) -> Option<RecordIndex> {
        self.rows.get(view_position).map(|r| r.index)
    }
}

/// Case-insensitive substring search over every field of every record.
/// An empty (or all-whitespace) keyword returns the whole table.
pub fn search(records: &[FeeRecord], keyword: &str) -> View {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return View::all(records);
    }
    View::matching(records, |r| {
        r.to_row()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    })
}

/// Month/year constraint over the Due Date column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDateFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl DueDateFilter {
    pub fn new(month: Option<u32>, year: Option<i32>) -> LedgerResult<Self> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(LedgerError::InvalidFilter(format!(
                    "month must be between 1 and 12, got {m}"
                )));
            }
        }
        Ok(Self { month, year })
    }

    pub fn is_active(&self) -> bool {
        self.month.is_some() || self.year.is_some()
    }

    /// A record with no due date never matches an active filter.
    pub fn matches(&self, record: &FeeRecord) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(due) = record.due_date else {
            return false;
        };
        self.month.map_or(true, |m| due.month() == m) && self.year.map_or(true, |y| due.year() == y)
    }
}

pub fn filter_by_due_date(
    records: &[FeeRecord],
    month: Option<u32>,
    year: Option<i32>,
) -> LedgerResult<View> {
    let filter = DueDateFilter::new(month, year)?;
    Ok(apply_due_date_filter(records, filter))
}

pub fn apply_due_date_filter(records: &[FeeRecord], filter: DueDateFilter) -> View {
    View::matching(records, |r| filter.matches(r))
}
