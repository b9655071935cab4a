//! Seeded sample sheets for demos and property tests.

use crate::{
    name_generator::NameGenerator,
    record::FeeRecord,
    rng::SheetRng,
    rules,
    types::Amount,
};
use chrono::{Datelike, Duration, NaiveDate};

const FEE_LEVELS: [Amount; 5] = [25_000, 40_000, 55_000, 75_000, 90_000];
const EMAIL_DOMAIN: &str = "students.example.edu";

/// Generate `rows` recomputed records. Same seed, same rows, same today:
/// same sheet.
///
/// Roughly a third of the students are fully paid, a tenth have no email,
/// and due dates are spread across the current year.
pub fn generate_sheet(seed: u64, rows: usize, today: NaiveDate) -> Vec<FeeRecord> {
    let mut rng = SheetRng::new(seed);
    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);

    let records = (0..rows)
        .map(|_| {
            let name = NameGenerator::full_name(&mut rng);
            let fee_amount = *rng.pick(&FEE_LEVELS);
            let fee_paid = if rng.chance(0.35) {
                fee_amount
            } else {
                // Partial payments in steps of 500.
                rng.next_u64_below(fee_amount / 500) * 500
            };
            let email = if rng.chance(0.1) {
                String::new()
            } else {
                NameGenerator::email_for(&name, EMAIL_DOMAIN)
            };
            let due_date = year_start + Duration::days(rng.next_u64_below(365) as i64);

            FeeRecord {
                mobile_number: NameGenerator::mobile_number(&mut rng),
                year: NameGenerator::year(&mut rng).to_string(),
                dept: NameGenerator::dept(&mut rng).to_string(),
                name,
                fee_amount,
                fee_paid,
                balance: 0,
                due_date: Some(due_date),
                email,
                fee_paid_on: None,
            }
        })
        .collect();

    rules::recompute(records, today)
}
