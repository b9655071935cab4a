//! Strict header validation.

use feedesk_core::{
    schema::{validate, STRICT_COLUMNS},
    SchemaError,
};

#[test]
fn canonical_header_is_accepted() {
    assert_eq!(validate(&STRICT_COLUMNS), Ok(()));
}

#[test]
fn missing_columns_are_rejected() {
    let err = validate(&["Name", "Mobile Number", "Year"]).unwrap_err();
    let SchemaError::HeaderMismatch { expected, found } = err;
    assert_eq!(expected.len(), 10);
    assert_eq!(found, vec!["Name", "Mobile Number", "Year"]);
}

#[test]
fn reordered_columns_are_rejected() {
    let mut header = STRICT_COLUMNS;
    header.swap(4, 5);
    assert!(
        validate(&header).is_err(),
        "Fee Amount / Fee Paid swapped must not pass"
    );
}

#[test]
fn casing_and_extra_columns_are_rejected() {
    let mut lower = STRICT_COLUMNS.map(str::to_string);
    lower[0] = "name".into();
    assert!(validate(&lower).is_err(), "header match is case-sensitive");

    let mut extra: Vec<&str> = STRICT_COLUMNS.to_vec();
    extra.push("Notes");
    assert!(validate(&extra).is_err(), "an eleventh column must not pass");

    let padded: Vec<String> = STRICT_COLUMNS.iter().map(|c| format!(" {c}")).collect();
    assert!(validate(&padded).is_err(), "names are matched byte for byte");
}

#[test]
fn rejection_message_explains_the_rule() {
    let msg = validate(&["Student"]).unwrap_err().to_string();
    assert!(
        msg.contains("Only files created by this application"),
        "unexpected message: {msg}"
    );
}
