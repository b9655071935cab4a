//! Search and due-date filtering over a table snapshot.

use chrono::NaiveDate;
use feedesk_core::{
    query::{filter_by_due_date, search, View},
    FeeRecord, LedgerError,
};

fn record(name: &str, dept: &str, due: Option<(i32, u32, u32)>) -> FeeRecord {
    FeeRecord {
        name: name.into(),
        mobile_number: "9876543210".into(),
        dept: dept.into(),
        fee_amount: 5000,
        fee_paid: 1000,
        balance: 4000,
        due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        email: format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
        ..Default::default()
    }
}

fn names(view: &View) -> Vec<&str> {
    view.records().map(|r| r.name.as_str()).collect()
}

fn due_date_table() -> Vec<FeeRecord> {
    vec![
        record("March", "CSE", Some((2025, 3, 10))),
        record("April", "ECE", Some((2025, 4, 1))),
        record("Blank", "IT", None),
    ]
}

#[test]
fn empty_keyword_returns_everything_in_order() {
    let table = vec![record("B", "CSE", None), record("A", "ECE", None)];
    let view = search(&table, "");
    assert_eq!(names(&view), vec!["B", "A"]);
    assert_eq!(view.rows[1].index, 1);
    assert_eq!(search(&table, "   ").len(), 2, "whitespace-only keyword is empty");
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let table = vec![
        record("John Mathew", "CSE", None),
        record("Priya", "ECE", None),
        record("Arjun", "JOHNSON HALL", None),
    ];
    let view = search(&table, "john");
    assert_eq!(names(&view), vec!["John Mathew", "Arjun"]);
    assert_eq!(view.table_index(1), Some(2), "view rows keep their table index");
}

#[test]
fn search_matches_numbers_and_dates_as_text() {
    let table = due_date_table();
    assert_eq!(names(&search(&table, "2025-04")), vec!["April"]);
    assert_eq!(search(&table, "4000").len(), 3, "balance is searchable");
    assert!(search(&table, "nobody").is_empty());
}

#[test]
fn month_and_year_filter_combine_with_and() {
    let table = due_date_table();
    let view = filter_by_due_date(&table, Some(3), Some(2025)).unwrap();
    assert_eq!(names(&view), vec!["March"]);

    let view = filter_by_due_date(&table, Some(3), Some(2024)).unwrap();
    assert!(view.is_empty());
}

#[test]
fn blank_due_dates_never_match_an_active_filter() {
    let table = due_date_table();
    assert_eq!(names(&filter_by_due_date(&table, Some(4), None).unwrap()), vec!["April"]);
    assert_eq!(
        names(&filter_by_due_date(&table, None, Some(2025)).unwrap()),
        vec!["March", "April"]
    );
}

#[test]
fn no_constraint_shows_every_record_including_blank_dates() {
    let table = due_date_table();
    let view = filter_by_due_date(&table, None, None).unwrap();
    assert_eq!(names(&view), vec!["March", "April", "Blank"]);
}

#[test]
fn out_of_range_month_is_rejected() {
    let table = due_date_table();
    assert!(matches!(
        filter_by_due_date(&table, Some(13), None),
        Err(LedgerError::InvalidFilter(_))
    ));
    assert!(filter_by_due_date(&table, Some(0), None).is_err());
}

#[test]
fn filtering_leaves_records_untouched() {
    let table = due_date_table();
    let before = table.clone();
    let _ = search(&table, "march");
    let _ = filter_by_due_date(&table, Some(3), None).unwrap();
    assert_eq!(table, before);
}
