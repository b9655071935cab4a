//! The business rule engine: derived-field recomputation.
//!
//! Applied to the whole table after every insert, update and delete,
//! and before every save. After it runs, for every record:
//!   - balance == max(0, fee_amount - fee_paid)
//!   - balance == 0  <=>  due_date is empty and fee_paid_on is set
//!   - balance  > 0  <=>  fee_paid_on is empty

use crate::{record::FeeRecord, types::Amount};
use chrono::NaiveDate;

/// Recompute every record of a table. Pure: same input and same `today`
/// give the same output, and applying it twice changes nothing.
pub fn recompute(records: Vec<FeeRecord>, today: NaiveDate) -> Vec<FeeRecord> {
    records
        .into_iter()
        .map(|r| recompute_record(r, today))
        .collect()
}

pub fn recompute_record(mut record: FeeRecord, today: NaiveDate) -> FeeRecord {
    record.balance = balance_of(record.fee_amount, record.fee_paid);
    if record.balance == 0 {
        // Keep an existing paid-on date; only stamp a fresh settlement.
        record.fee_paid_on.get_or_insert(today);
        record.due_date = None;
    } else {
        record.fee_paid_on = None;
    }
    record
}

pub fn balance_of(fee_amount: Amount, fee_paid: Amount) -> Amount {
    fee_amount.saturating_sub(fee_paid)
}

/// Sum of every balance due, saturating at `Amount::MAX`.
pub fn total_outstanding(records: &[FeeRecord]) -> Amount {
    records.iter().map(|r| r.balance).fold(0, Amount::saturating_add)
}

/// Does the record satisfy every derived-field invariant?
pub fn is_consistent(record: &FeeRecord) -> bool {
    let balance_ok = record.balance == balance_of(record.fee_amount, record.fee_paid);
    let settled = record.due_date.is_none() && record.fee_paid_on.is_some();
    let unpaid = record.fee_paid_on.is_none();
    balance_ok && (record.balance == 0) == settled && (record.balance > 0) == unpaid
}
