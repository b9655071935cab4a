//! Desk events. Every session action that changes or exports data is
//! described by one LedgerEvent and appended to the journal.

use crate::{
    record::ParseWarning,
    types::{RecordIndex, SessionId, SheetId},
};
use serde::{Deserialize, Serialize};

/// Variants are append-only; the journal stores their tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    // ── Sheet lifecycle ────────────────────────────
    SheetCreated {
        sheet: SheetId,
    },
    SheetOpened {
        sheet: SheetId,
        records: usize,
        warnings: Vec<ParseWarning>,
    },
    SheetRejected {
        sheet: SheetId,
        reason: String,
    },
    SheetSaved {
        sheet: SheetId,
        records: usize,
    },

    // ── Record mutations ───────────────────────────
    RecordInserted {
        index: RecordIndex,
        name: String,
    },
    RecordUpdated {
        index: RecordIndex,
        name: String,
    },
    RecordDeleted {
        index: RecordIndex,
        name: String,
    },

    // ── Outputs ────────────────────────────────────
    ReportExported {
        path: String,
        rows: usize,
    },
    ReminderSent {
        recipient: String,
    },
    ReminderFailed {
        recipient: String,
        diagnostic: String,
    },
}

impl LedgerEvent {
    /// Stable name stored in the journal's event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SheetCreated { .. }   => "sheet_created",
            Self::SheetOpened { .. }    => "sheet_opened",
            Self::SheetRejected { .. }  => "sheet_rejected",
            Self::SheetSaved { .. }     => "sheet_saved",
            Self::RecordInserted { .. } => "record_inserted",
            Self::RecordUpdated { .. }  => "record_updated",
            Self::RecordDeleted { .. }  => "record_deleted",
            Self::ReportExported { .. } => "report_exported",
            Self::ReminderSent { .. }   => "reminder_sent",
            Self::ReminderFailed { .. } => "reminder_failed",
        }
    }
}

/// A persisted journal row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id:          Option<i64>,
    pub session_id:  SessionId,
    pub sheet:       SheetId,
    pub event_type:  String,
    pub payload:     String,
    pub recorded_at: String,
}
