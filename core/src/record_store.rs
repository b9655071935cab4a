//! The in-memory record store: one table per open sheet identity.
//!
//! RULE: Every mutating call returns only after the touched table has
//! been recomputed. Callers never see a half-updated table.

use crate::{
    clock::Clock,
    error::{LedgerError, LedgerResult},
    record::FeeRecord,
    table::FeeTable,
    types::{RecordIndex, SheetId},
};

pub struct RecordStore {
    clock: Box<dyn Clock>,
    // Insertion order is kept so sheet listings are stable.
    tables: Vec<FeeTable>,
}

impl RecordStore {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            tables: Vec::new(),
        }
    }

    /// Install a table under `id`, replacing any table already open
    /// under the same identity. The records are recomputed.
    pub fn open_table(&mut self, id: impl Into<SheetId>, records: Vec<FeeRecord>) -> &FeeTable {
        let table = FeeTable::new(id, records, self.clock.today());
        let slot = match self.tables.iter().position(|t| t.id() == table.id()) {
            Some(pos) => {
                self.tables[pos] = table;
                pos
            }
            None => {
                self.tables.push(table);
                self.tables.len() - 1
            }
        };
        &self.tables[slot]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables.iter().any(|t| t.id() == id)
    }

    pub fn identities(&self) -> Vec<SheetId> {
        self.tables.iter().map(|t| t.id().to_string()).collect()
    }

    pub fn table(&self, id: &str) -> LedgerResult<&FeeTable> {
        self.tables
            .iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| LedgerError::UnknownSheet { id: id.to_string() })
    }

    fn table_mut(&mut self, id: &str) -> LedgerResult<&mut FeeTable> {
        self.tables
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| LedgerError::UnknownSheet { id: id.to_string() })
    }

    pub fn insert(&mut self, id: &str, record: FeeRecord) -> LedgerResult<RecordIndex> {
        let today = self.clock.today();
        let index = self.table_mut(id)?.insert(record, today);
        log::debug!("{id}: inserted record {index}");
        Ok(index)
    }

    pub fn update(&mut self, id: &str, index: RecordIndex, record: FeeRecord) -> LedgerResult<()> {
        let today = self.clock.today();
        self.table_mut(id)?.update(index, record, today)?;
        log::debug!("{id}: updated record {index}");
        Ok(())
    }

    pub fn delete(&mut self, id: &str, index: RecordIndex) -> LedgerResult<FeeRecord> {
        let today = self.clock.today();
        let removed = self.table_mut(id)?.delete(index, today)?;
        log::debug!("{id}: deleted record {index}");
        Ok(removed)
    }

    /// Recompute a table in place and return a snapshot of it, ready to persist.
    pub fn recomputed(&mut self, id: &str) -> LedgerResult<Vec<FeeRecord>> {
        let today = self.clock.today();
        let table = self.table_mut(id)?;
        table.recompute(today);
        Ok(table.get_all())
    }

    pub fn get_all(&self, id: &str) -> LedgerResult<Vec<FeeRecord>> {
        Ok(self.table(id)?.get_all())
    }
}
