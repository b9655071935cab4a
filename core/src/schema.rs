//! The strict sheet schema.
//!
//! RULE: A sheet is accepted only if its header row is exactly
//! STRICT_COLUMNS, same names, same order, same casing.
//! Nothing is auto-corrected and nothing is partially loaded.

use crate::error::SchemaError;

pub const STRICT_COLUMNS: [&str; 10] = [
    "Name",
    "Mobile Number",
    "Year",
    "Dept",
    "Fee Amount",
    "Fee Paid",
    "Balance",
    "Due Date",
    "Email",
    "Fee Paid On",
];

/// Columns carried into the printed report, in print order.
pub const REPORT_COLUMNS: [&str; 4] = ["Name", "Mobile Number", "Balance", "Due Date"];

/// Check a candidate header row against the strict schema.
pub fn validate<S: AsRef<str>>(header: &[S]) -> Result<(), SchemaError> {
    let matches = header.len() == STRICT_COLUMNS.len()
        && header
            .iter()
            .zip(STRICT_COLUMNS.iter())
            .all(|(found, expected)| found.as_ref() == *expected);

    if matches {
        Ok(())
    } else {
        Err(SchemaError::HeaderMismatch {
            expected: STRICT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found: header.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }
}
