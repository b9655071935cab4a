//! One open sheet: an ordered, always-recomputed list of fee records.

use crate::{
    error::IndexError,
    record::FeeRecord,
    rules,
    types::{RecordIndex, SheetId},
};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeTable {
    id: SheetId,
    records: Vec<FeeRecord>,
}

impl FeeTable {
    /// Build a table from loaded records. The records are recomputed
    /// before the table is handed out.
    pub fn new(id: impl Into<SheetId>, records: Vec<FeeRecord>, today: NaiveDate) -> Self {
        Self {
            id: id.into(),
            records: rules::recompute(records, today),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view of the current records. Does not track later edits.
    pub fn records(&self) -> &[FeeRecord] {
        &self.records
    }

    /// Owned copy of the current records.
    pub fn get_all(&self) -> Vec<FeeRecord> {
        self.records.clone()
    }

    /// Append a record. Returns the index it landed at.
    pub fn insert(&mut self, record: FeeRecord, today: NaiveDate) -> RecordIndex {
        self.records.push(record);
        self.recompute(today);
        self.records.len() - 1
    }

    pub fn update(
        &mut self,
        index: RecordIndex,
        record: FeeRecord,
        today: NaiveDate,
    ) -> Result<(), IndexError> {
        self.check_index(index)?;
        self.records[index] = record;
        self.recompute(today);
        Ok(())
    }

    /// Remove a record. Later records shift down so indices stay contiguous.
    pub fn delete(
        &mut self,
        index: RecordIndex,
        today: NaiveDate,
    ) -> Result<FeeRecord, IndexError> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        self.recompute(today);
        Ok(removed)
    }

    pub fn recompute(&mut self, today: NaiveDate) {
        let records = std::mem::take(&mut self.records);
        self.records = rules::recompute(records, today);
    }

    fn check_index(&self, index: RecordIndex) -> Result<(), IndexError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(IndexError::OutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }
}
