//! Report rendering.

use chrono::NaiveDate;
use feedesk_core::{
    query::View,
    report::{report_rows, PdfReport, ReportRenderer},
    sample::generate_sheet,
    FeeRecord,
};

#[test]
fn report_rows_keep_view_order_and_four_columns() {
    let records = vec![
        FeeRecord {
            name: "Ravi".into(),
            mobile_number: "9000000001".into(),
            balance: 3000,
            due_date: NaiveDate::from_ymd_opt(2026, 11, 30),
            ..Default::default()
        },
        FeeRecord {
            name: "Asha".into(),
            ..Default::default()
        },
    ];
    let rows = report_rows(&View::all(&records));
    assert_eq!(rows[0], ["Ravi", "9000000001", "3000", "2026-11-30"].map(String::from));
    assert_eq!(rows[1], ["Asha", "", "0", ""].map(String::from), "missing values print empty");
}

#[test]
fn long_views_render_across_pages() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let records = generate_sheet(7, 120, today);
    let bytes = PdfReport
        .render("Student Fee Report", &View::all(&records))
        .expect("render");
    assert!(bytes.starts_with(b"%PDF"));

    let single = PdfReport
        .render("Student Fee Report", &View::all(&records[..3]))
        .expect("render");
    assert!(bytes.len() > single.len(), "120 rows should produce a larger document");
}
