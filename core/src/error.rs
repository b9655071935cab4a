use thiserror::Error;

use crate::types::RecordIndex;

/// Rejection raised when a file's header row is not the strict schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error(
        "This file is not in the strict format. Only files created by this application \
         with the exact headers can be opened (expected {expected:?}, found {found:?})"
    )]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Record {index} does not exist (table has {len} records)")]
    OutOfRange { index: RecordIndex, len: usize },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Journal error: {0}")]
    Journal(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No sheet selected")]
    NoSheetSelected,

    #[error("Sheet '{id}' is not open")]
    UnknownSheet { id: String },

    #[error("No data to export")]
    EmptyView,

    #[error("No students with dues found")]
    NoRecipients,

    #[error("Selected record has no due balance")]
    NoBalanceDue,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to render report: {0}")]
    Render(String),

    #[error("Mail transport is not configured: {0}")]
    MailSetup(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
