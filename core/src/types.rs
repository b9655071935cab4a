//! Shared primitive types used across the fee ledger.

/// A money amount in whole currency units. Fees are never negative.
pub type Amount = u64;

/// The identity of an open sheet: the path of the file it was loaded from.
pub type SheetId = String;

/// Position of a record inside a table. Always contiguous from 0.
pub type RecordIndex = usize;

/// Identifier of one desk session, stamped on every journal entry.
pub type SessionId = String;
