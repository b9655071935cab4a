//! The fee record and its conversion to and from raw sheet rows.

use crate::{schema::STRICT_COLUMNS, types::Amount};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Dates are stored and displayed as YYYY-MM-DD.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One student fee entry. Field order matches STRICT_COLUMNS.
///
/// `balance`, `due_date` (clearing) and `fee_paid_on` are derived;
/// whatever a caller puts there is overwritten by the next recompute.
///
/// Deserializing follows the same leniency as reading a row: absent fields
/// are empty, and fee values that are not non-negative numbers become 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeRecord {
    pub name: String,
    pub mobile_number: String,
    pub year: String,
    pub dept: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub fee_amount: Amount,
    #[serde(deserialize_with = "lenient_amount")]
    pub fee_paid: Amount,
    pub balance: Amount,
    pub due_date: Option<NaiveDate>,
    pub email: String,
    pub fee_paid_on: Option<NaiveDate>,
}

/// A cell that could not be read as its declared type and was coerced.
/// Non-fatal: the row still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub coerced_to: String,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}: '{}' value {:?} read as {:?}",
            self.row, self.column, self.raw, self.coerced_to
        )
    }
}

impl FeeRecord {
    /// Build a record from a raw row of cells in STRICT_COLUMNS order.
    ///
    /// Missing trailing cells are treated as empty. Text cells are kept
    /// verbatim; only number and date cells are trimmed before parsing.
    /// `row` is the 0-based data row number, used only to label warnings.
    pub fn from_row<S: AsRef<str>>(row: usize, cells: &[S]) -> (Self, Vec<ParseWarning>) {
        let cell = |i: usize| cells.get(i).map(|c| c.as_ref()).unwrap_or("");
        let mut warnings = Vec::new();

        let fee_amount = read_amount(row, STRICT_COLUMNS[4], cell(4).trim(), &mut warnings);
        let fee_paid = read_amount(row, STRICT_COLUMNS[5], cell(5).trim(), &mut warnings);
        let due_date = read_date(row, STRICT_COLUMNS[7], cell(7), &mut warnings);
        let fee_paid_on = read_date(row, STRICT_COLUMNS[9], cell(9), &mut warnings);

        let record = Self {
            name: cell(0).to_string(),
            mobile_number: cell(1).to_string(),
            year: cell(2).to_string(),
            dept: cell(3).to_string(),
            fee_amount,
            fee_paid,
            // Recomputed from the two fee columns; the stored cell is ignored.
            balance: 0,
            due_date,
            email: cell(8).to_string(),
            fee_paid_on,
        };
        (record, warnings)
    }

    /// Every field rendered as text, in STRICT_COLUMNS order.
    /// Empty dates render as empty strings.
    pub fn to_row(&self) -> [String; 10] {
        [
            self.name.clone(),
            self.mobile_number.clone(),
            self.year.clone(),
            self.dept.clone(),
            self.fee_amount.to_string(),
            self.fee_paid.to_string(),
            self.balance.to_string(),
            format_date(self.due_date),
            self.email.clone(),
            format_date(self.fee_paid_on),
        ]
    }

    pub fn has_dues(&self) -> bool {
        self.balance > 0
    }
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

/// Parse a date cell. Accepts a plain ISO date, or an ISO date with a
/// time part as spreadsheet exports write it. `Err` means unparseable.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(Some(d));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| Some(dt.date()))
        .ok_or(())
}

/// Parse an amount. Empty is 0; decimals are truncated.
/// `None` for negatives and garbage, which callers coerce to 0.
fn parse_amount(raw: &str) -> Option<Amount> {
    if raw.is_empty() {
        return Some(0);
    }
    if let Ok(v) = raw.parse::<Amount>() {
        return Some(v);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > -1.0)
        .map(|v| v.trunc().max(0.0) as Amount)
}

/// Parse an amount cell, warning when it had to be coerced to 0.
fn read_amount(
    row: usize,
    column: &'static str,
    raw: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Amount {
    match parse_amount(raw) {
        Some(v) => v,
        None => {
            warnings.push(ParseWarning {
                row,
                column: column.to_string(),
                raw: raw.to_string(),
                coerced_to: "0".into(),
            });
            0
        }
    }
}

/// Accepts a JSON number, a numeric string, null or nothing at all.
/// Anything else is 0, as a bad cell would be.
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    let raw = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    Ok(parse_amount(&raw).unwrap_or_else(|| {
        log::warn!("fee value {raw:?} read as 0");
        0
    }))
}

fn read_date(
    row: usize,
    column: &'static str,
    raw: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Option<NaiveDate> {
    match parse_date(raw) {
        Ok(d) => d,
        Err(()) => {
            warnings.push(ParseWarning {
                row,
                column: column.to_string(),
                raw: raw.to_string(),
                coerced_to: String::new(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_amounts_are_truncated() {
        let (r, w) = FeeRecord::from_row(0, &["A", "", "", "", "5000.0", "1999.9"]);
        assert_eq!(r.fee_amount, 5000);
        assert_eq!(r.fee_paid, 1999);
        assert!(w.is_empty());
    }

    #[test]
    fn negative_and_garbage_amounts_warn() {
        let (r, w) = FeeRecord::from_row(3, &["A", "", "", "", "-20", "lots"]);
        assert_eq!((r.fee_amount, r.fee_paid), (0, 0));
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].row, 3);
        assert_eq!(w[1].column, "Fee Paid");
    }

    #[test]
    fn text_cells_keep_their_whitespace() {
        let (r, w) = FeeRecord::from_row(0, &["  Asha ", " 98 ", "II", "CSE", " 100 ", "0"]);
        assert_eq!(r.name, "  Asha ");
        assert_eq!(r.mobile_number, " 98 ");
        assert_eq!(r.fee_amount, 100);
        assert!(w.is_empty());
    }

    #[test]
    fn json_records_fill_missing_fields() {
        let r: FeeRecord =
            serde_json::from_str(r#"{"name":"X","fee_amount":5000,"fee_paid":0}"#).unwrap();
        assert_eq!(r.name, "X");
        assert_eq!(r.mobile_number, "");
        assert_eq!(r.email, "");
        assert_eq!((r.fee_amount, r.fee_paid), (5000, 0));
        assert_eq!(r.due_date, None);
    }

    #[test]
    fn json_fees_are_coerced_like_cells() {
        let r: FeeRecord =
            serde_json::from_str(r#"{"name":"X","fee_amount":-5,"fee_paid":"abc"}"#).unwrap();
        assert_eq!((r.fee_amount, r.fee_paid), (0, 0));

        let r: FeeRecord =
            serde_json::from_str(r#"{"fee_amount":"4500.0","fee_paid":null}"#).unwrap();
        assert_eq!((r.fee_amount, r.fee_paid), (4500, 0));

        let r: FeeRecord = serde_json::from_str(r#"{"fee_amount":true}"#).unwrap();
        assert_eq!(r.fee_amount, 0);
    }

    #[test]
    fn timestamped_dates_keep_the_day() {
        assert_eq!(
            parse_date("2025-03-10 00:00:00"),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 10))
        );
        assert_eq!(parse_date("10/03/2025"), Err(()));
        assert_eq!(parse_date("  "), Ok(None));
    }
}
