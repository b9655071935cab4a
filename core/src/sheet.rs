//! Sheet persistence: reading and writing strict-schema CSV files.
//!
//! RULE: Only sheet.rs touches sheet files on disk.
//! A save rewrites the whole file through a sibling temp file and a rename,
//! so a failed save never leaves a half-written sheet behind.

use crate::{
    error::LedgerResult,
    record::{FeeRecord, ParseWarning},
    schema::{self, STRICT_COLUMNS},
};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Records read from a sheet, plus every cell that had to be coerced.
#[derive(Debug, Clone, Default)]
pub struct LoadedSheet {
    pub records: Vec<FeeRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// The persistence collaborator.
pub trait SheetIo {
    /// Read a sheet. Fails with a schema error if the header row is not
    /// the strict schema; no records are returned in that case.
    fn read(&self, path: &Path) -> LedgerResult<LoadedSheet>;

    /// Replace the file at `path` with a header row and one row per record.
    fn write(&self, path: &Path, records: &[FeeRecord]) -> LedgerResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSheetIo;

impl SheetIo for CsvSheetIo {
    fn read(&self, path: &Path) -> LedgerResult<LoadedSheet> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        schema::validate(&header)?;

        let mut sheet = LoadedSheet::default();
        for row in rdr.records() {
            let row = row?;
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let cells: Vec<&str> = row.iter().collect();
            let index = sheet.records.len();
            let (record, warnings) = FeeRecord::from_row(index, &cells);
            sheet.records.push(record);
            sheet.warnings.extend(warnings);
            if cells.len() > STRICT_COLUMNS.len() {
                sheet.warnings.push(ParseWarning {
                    row: index,
                    column: "(beyond Fee Paid On)".into(),
                    raw: cells[STRICT_COLUMNS.len()..].join(","),
                    coerced_to: String::new(),
                });
            }
        }
        Ok(sheet)
    }

    fn write(&self, path: &Path, records: &[FeeRecord]) -> LedgerResult<()> {
        let tmp = temp_sibling(path);
        let written = write_csv(&tmp, records).and_then(|()| {
            fs::rename(&tmp, path)?;
            Ok(())
        });
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }
}

fn write_csv(path: &Path, records: &[FeeRecord]) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(STRICT_COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `bytes` to `path` through a temp sibling, replacing any old file
/// only once the new content is fully on disk.
pub fn write_replacing(path: &Path, bytes: &[u8]) -> LedgerResult<()> {
    let tmp = temp_sibling(path);
    let written = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    Ok(written?)
}
