//! The desk session: everything one operator has open, and every action
//! they can take on it.
//!
//! RULES:
//!   - The session owns all state; there are no process-wide globals.
//!   - Actions run one at a time, to completion.
//!   - Every mutation goes through the record store, so tables are
//!     recomputed before any caller, file, report or mail sees them.
//!   - After a mutation the current view is reset to the whole table.
//!   - Outcomes are returned as values; the presentation layer decides
//!     how to show them.

use crate::{
    clock::{Clock, SystemClock},
    config::DeskConfig,
    error::{LedgerError, LedgerResult},
    event::LedgerEvent,
    journal::JournalStore,
    query::{self, DueDateFilter, View},
    record::{FeeRecord, ParseWarning},
    record_store::RecordStore,
    reminder::{self, DeliveryReport, Mailer, ReminderScope},
    report::{PdfReport, ReportRenderer},
    sheet::{self, CsvSheetIo, SheetIo},
    types::{RecordIndex, SessionId, SheetId},
};
use std::path::Path;

/// What an open produced: the sheet identity and any coerced cells.
#[derive(Debug, Clone)]
pub struct OpenOutcome {
    pub sheet: SheetId,
    pub records: usize,
    pub warnings: Vec<ParseWarning>,
}

pub struct FeeSession {
    pub session_id: SessionId,
    config:   DeskConfig,
    store:    RecordStore,
    sheets:   Box<dyn SheetIo>,
    renderer: Box<dyn ReportRenderer>,
    journal:  JournalStore,
    selected: Option<SheetId>,
    view:     View,
}

impl FeeSession {
    pub fn new(
        config: DeskConfig,
        clock: Box<dyn Clock>,
        sheets: Box<dyn SheetIo>,
        renderer: Box<dyn ReportRenderer>,
        journal: JournalStore,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            config,
            store: RecordStore::new(clock),
            sheets,
            renderer,
            journal,
            selected: None,
            view: View::default(),
        }
    }

    /// Build a fully wired session: system clock, CSV sheets, PDF reports,
    /// and the journal named in the config (in memory if none).
    pub fn build(config: DeskConfig) -> LedgerResult<Self> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Like `build`, with a caller-supplied clock.
    pub fn with_clock(config: DeskConfig, clock: Box<dyn Clock>) -> LedgerResult<Self> {
        let journal = match &config.journal_path {
            Some(path) => JournalStore::open(path)?,
            None => JournalStore::in_memory()?,
        };
        journal.migrate()?;
        Ok(Self::new(
            config,
            clock,
            Box::new(CsvSheetIo),
            Box::new(PdfReport),
            journal,
        ))
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn journal(&self) -> &JournalStore {
        &self.journal
    }

    // ── Sheets ─────────────────────────────────────────────────

    /// Create a new, empty strict sheet on disk and select it.
    pub fn create_sheet(&mut self, path: &Path) -> LedgerResult<SheetId> {
        self.sheets.write(path, &[])?;
        let id = sheet_id(path);
        self.store.open_table(id.clone(), Vec::new());
        self.select_unchecked(&id);
        log::info!("Created strict sheet {id}");
        self.record_event(&id, LedgerEvent::SheetCreated { sheet: id.clone() });
        Ok(id)
    }

    /// Open a strict sheet and select it. A sheet with the wrong header is
    /// rejected whole and the session is left as it was.
    pub fn open_sheet(&mut self, path: &Path) -> LedgerResult<OpenOutcome> {
        let id = sheet_id(path);
        let loaded = match self.sheets.read(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                if let LedgerError::Schema(schema) = &e {
                    log::warn!("Rejected {id}: {schema}");
                    self.record_event(
                        &id,
                        LedgerEvent::SheetRejected {
                            sheet: id.clone(),
                            reason: schema.to_string(),
                        },
                    );
                }
                return Err(e);
            }
        };

        for warning in &loaded.warnings {
            log::warn!("{id}: {warning}");
        }
        let records = self.store.open_table(id.clone(), loaded.records).len();
        self.select_unchecked(&id);
        log::info!("Loaded {id} ({records} records)");
        self.record_event(
            &id,
            LedgerEvent::SheetOpened {
                sheet: id.clone(),
                records,
                warnings: loaded.warnings.clone(),
            },
        );
        Ok(OpenOutcome {
            sheet: id,
            records,
            warnings: loaded.warnings,
        })
    }

    /// Rewrite the selected sheet's file from the (recomputed) table.
    /// On failure the file and the table are both left as they were.
    pub fn save(&mut self) -> LedgerResult<()> {
        let id = self.selected_id()?;
        let records = self.store.recomputed(&id)?;
        self.sheets.write(Path::new(&id), &records)?;
        log::info!("Saved {id} ({} records)", records.len());
        self.record_event(
            &id,
            LedgerEvent::SheetSaved {
                sheet: id.clone(),
                records: records.len(),
            },
        );
        Ok(())
    }

    pub fn select(&mut self, id: &str) -> LedgerResult<()> {
        if !self.store.contains(id) {
            return Err(LedgerError::UnknownSheet { id: id.to_string() });
        }
        self.select_unchecked(id);
        Ok(())
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Open sheet identities, in the order they were first opened.
    pub fn sheets(&self) -> Vec<SheetId> {
        self.store.identities()
    }

    /// The selected sheet's records, in table order.
    pub fn records(&self) -> LedgerResult<&[FeeRecord]> {
        let id = self.selected_id()?;
        Ok(self.store.table(&id)?.records())
    }

    // ── Records ────────────────────────────────────────────────

    pub fn add_record(&mut self, record: FeeRecord) -> LedgerResult<RecordIndex> {
        let id = self.selected_id()?;
        let name = record.name.clone();
        let index = self.store.insert(&id, record)?;
        self.reset_view(&id)?;
        self.record_event(&id, LedgerEvent::RecordInserted { index, name });
        Ok(index)
    }

    pub fn edit_record(&mut self, index: RecordIndex, record: FeeRecord) -> LedgerResult<()> {
        let id = self.selected_id()?;
        let name = record.name.clone();
        self.store.update(&id, index, record)?;
        self.reset_view(&id)?;
        self.record_event(&id, LedgerEvent::RecordUpdated { index, name });
        Ok(())
    }

    pub fn delete_record(&mut self, index: RecordIndex) -> LedgerResult<FeeRecord> {
        let id = self.selected_id()?;
        let removed = self.store.delete(&id, index)?;
        self.reset_view(&id)?;
        self.record_event(
            &id,
            LedgerEvent::RecordDeleted {
                index,
                name: removed.name.clone(),
            },
        );
        Ok(removed)
    }

    // ── Views ──────────────────────────────────────────────────

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn search(&mut self, keyword: &str) -> LedgerResult<&View> {
        let view = query::search(self.records()?, keyword);
        self.view = view;
        Ok(&self.view)
    }

    /// An invalid filter leaves the current view unchanged.
    pub fn filter_by_due_date(
        &mut self,
        month: Option<u32>,
        year: Option<i32>,
    ) -> LedgerResult<&View> {
        let filter = DueDateFilter::new(month, year)?;
        let view = query::apply_due_date_filter(self.records()?, filter);
        self.view = view;
        Ok(&self.view)
    }

    pub fn clear_filters(&mut self) -> LedgerResult<&View> {
        let id = self.selected_id()?;
        self.reset_view(&id)?;
        Ok(&self.view)
    }

    // ── Outputs ────────────────────────────────────────────────

    /// Render the current view to `path`. Nothing is written unless the
    /// whole document rendered. Returns the number of rows exported.
    pub fn export_report(&mut self, path: &Path) -> LedgerResult<usize> {
        if self.view.is_empty() {
            return Err(LedgerError::EmptyView);
        }
        let bytes = self.renderer.render(&self.config.report_title, &self.view)?;
        sheet::write_replacing(path, &bytes)?;

        let rows = self.view.len();
        let target = path.to_string_lossy().into_owned();
        log::info!("Exported {rows} rows to {target}");
        let sheet = self.selected.clone().unwrap_or_default();
        self.record_event(&sheet, LedgerEvent::ReportExported { path: target, rows });
        Ok(rows)
    }

    /// Send payment reminders for the selected sheet through `mailer`.
    /// Every recipient is attempted; failures come back in the report.
    pub fn send_reminders(
        &mut self,
        scope: ReminderScope,
        mailer: &dyn Mailer,
    ) -> LedgerResult<DeliveryReport> {
        let id = self.selected_id()?;
        let records = self.store.recomputed(&id)?;
        let batch = reminder::build_batch(&records, scope, &self.config.reminder_signature)?;

        let report = reminder::dispatch(mailer, batch);

        for recipient in &report.delivered {
            self.record_event(
                &id,
                LedgerEvent::ReminderSent {
                    recipient: recipient.clone(),
                },
            );
        }
        for failure in &report.failures {
            self.record_event(
                &id,
                LedgerEvent::ReminderFailed {
                    recipient: failure.recipient.clone(),
                    diagnostic: failure.diagnostic.clone(),
                },
            );
        }
        log::info!(
            "Reminders for {id}: sent {}, failed {}",
            report.sent(),
            report.failed()
        );
        Ok(report)
    }

    // ── Internals ──────────────────────────────────────────────

    fn selected_id(&self) -> LedgerResult<SheetId> {
        self.selected.clone().ok_or(LedgerError::NoSheetSelected)
    }

    fn select_unchecked(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.view = self
            .store
            .table(id)
            .map(|t| View::all(t.records()))
            .unwrap_or_default();
    }

    fn reset_view(&mut self, id: &str) -> LedgerResult<()> {
        self.view = View::all(self.store.table(id)?.records());
        Ok(())
    }

    /// The action has already happened; a journal failure is logged, not
    /// turned into an error for it.
    fn record_event(&self, sheet: &str, event: LedgerEvent) {
        if let Err(e) = self.journal.record(&self.session_id, sheet, &event) {
            log::warn!("Journal write failed for {}: {e}", event.type_name());
        }
    }
}

fn sheet_id(path: &Path) -> SheetId {
    path.to_string_lossy().into_owned()
}
