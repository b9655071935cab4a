//! Record store mutations: every call leaves the table recomputed.

use chrono::NaiveDate;
use feedesk_core::{
    clock::FixedClock, record_store::RecordStore, FeeRecord, IndexError, LedgerError,
};

const SHEET: &str = "/tmp/fees.csv";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn store_with_sheet() -> RecordStore {
    let mut store = RecordStore::new(Box::new(FixedClock(today())));
    store.open_table(SHEET, Vec::new());
    store
}

fn record(name: &str, amount: u64, paid: u64, due: Option<NaiveDate>) -> FeeRecord {
    FeeRecord {
        name: name.into(),
        fee_amount: amount,
        fee_paid: paid,
        due_date: due,
        email: format!("{}@example.edu", name.to_lowercase()),
        ..Default::default()
    }
}

#[test]
fn insert_fully_paid_record_settles_it() {
    let mut store = store_with_sheet();
    let due = NaiveDate::from_ymd_opt(2026, 11, 30);
    let index = store.insert(SHEET, record("Asha", 5000, 5000, due)).unwrap();

    assert_eq!(index, 0);
    let r = &store.get_all(SHEET).unwrap()[0];
    assert_eq!(r.balance, 0);
    assert_eq!(r.due_date, None);
    assert_eq!(r.fee_paid_on, Some(today()));
}

#[test]
fn insert_partial_payment_preserves_due_date() {
    let mut store = store_with_sheet();
    let due = NaiveDate::from_ymd_opt(2026, 11, 30);
    store.insert(SHEET, record("Ravi", 5000, 2000, due)).unwrap();

    let r = &store.get_all(SHEET).unwrap()[0];
    assert_eq!(r.balance, 3000);
    assert_eq!(r.fee_paid_on, None);
    assert_eq!(r.due_date, due);
}

#[test]
fn insert_appends_at_the_end() {
    let mut store = store_with_sheet();
    for (i, name) in ["A", "B", "C"].iter().enumerate() {
        let index = store.insert(SHEET, record(name, 100, 0, None)).unwrap();
        assert_eq!(index, i);
    }
    let names: Vec<String> = store.get_all(SHEET).unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn update_replaces_in_place_and_recomputes() {
    let mut store = store_with_sheet();
    store.insert(SHEET, record("A", 100, 0, None)).unwrap();
    store.insert(SHEET, record("B", 100, 0, None)).unwrap();

    store.update(SHEET, 1, record("B2", 100, 100, None)).unwrap();
    let all = store.get_all(SHEET).unwrap();
    assert_eq!(all[1].name, "B2");
    assert_eq!(all[1].balance, 0);
    assert_eq!(all[1].fee_paid_on, Some(today()));
    assert_eq!(all[0].name, "A", "other records untouched");
}

#[test]
fn update_out_of_range_fails_and_changes_nothing() {
    let mut store = store_with_sheet();
    store.insert(SHEET, record("A", 100, 0, None)).unwrap();
    let before = store.get_all(SHEET).unwrap();

    let err = store.update(SHEET, 5, record("X", 1, 1, None)).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Index(IndexError::OutOfRange { index: 5, len: 1 })
    ));
    assert_eq!(store.get_all(SHEET).unwrap(), before);
}

#[test]
fn delete_middle_record_reindexes_the_rest() {
    let mut store = store_with_sheet();
    store.insert(SHEET, record("First", 100, 0, None)).unwrap();
    store.insert(SHEET, record("Second", 200, 0, None)).unwrap();
    store.insert(SHEET, record("Third", 300, 300, None)).unwrap();
    let before = store.get_all(SHEET).unwrap();

    let removed = store.delete(SHEET, 1).unwrap();
    assert_eq!(removed.name, "Second");

    let after = store.get_all(SHEET).unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[2], "third record now sits at index 1");
}

#[test]
fn delete_on_empty_table_is_out_of_range() {
    let mut store = store_with_sheet();
    assert!(matches!(
        store.delete(SHEET, 0),
        Err(LedgerError::Index(IndexError::OutOfRange { index: 0, len: 0 }))
    ));
}

#[test]
fn tables_are_keyed_by_identity() {
    let mut store = store_with_sheet();
    store.open_table("/tmp/other.csv", vec![record("Solo", 10, 0, None)]);
    store.insert(SHEET, record("A", 100, 0, None)).unwrap();

    assert_eq!(store.get_all("/tmp/other.csv").unwrap().len(), 1);
    assert_eq!(store.get_all(SHEET).unwrap().len(), 1);
    assert_eq!(store.identities(), vec![SHEET.to_string(), "/tmp/other.csv".to_string()]);

    // Re-opening an identity replaces its table but keeps its place.
    store.open_table(SHEET, Vec::new());
    assert!(store.get_all(SHEET).unwrap().is_empty());
    assert_eq!(store.identities()[0], SHEET);

    assert!(matches!(
        store.insert("/tmp/missing.csv", record("X", 1, 0, None)),
        Err(LedgerError::UnknownSheet { .. })
    ));
}

#[test]
fn snapshots_do_not_track_later_edits() {
    let mut store = store_with_sheet();
    store.insert(SHEET, record("A", 100, 0, None)).unwrap();
    let snapshot = store.get_all(SHEET).unwrap();
    store.insert(SHEET, record("B", 100, 0, None)).unwrap();
    assert_eq!(snapshot.len(), 1);
}
