//! Seeded sample sheet generation.

use chrono::NaiveDate;
use feedesk_core::sample::generate_sheet;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

#[test]
fn same_seed_produces_identical_sheets() {
    assert_eq!(generate_sheet(1234, 50, today()), generate_sheet(1234, 50, today()));
}

#[test]
fn different_seeds_produce_different_sheets() {
    assert_ne!(generate_sheet(1, 50, today()), generate_sheet(2, 50, today()));
}

#[test]
fn sheets_mix_paid_and_owing_students() {
    let sheet = generate_sheet(42, 200, today());
    let paid = sheet.iter().filter(|r| r.balance == 0).count();
    let owing = sheet.len() - paid;
    let no_email = sheet.iter().filter(|r| r.email.is_empty()).count();

    assert_eq!(sheet.len(), 200);
    assert!(paid > 20 && owing > 20, "expected a mix, got {paid} paid / {owing} owing");
    assert!(no_email > 0, "some students should have no email");
    assert!(sheet
        .iter()
        .filter(|r| r.balance > 0)
        .all(|r| r.due_date.is_some_and(|d| d.format("%Y").to_string() == "2026")));
}
