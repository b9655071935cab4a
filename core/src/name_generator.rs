//! Deterministic student names and academic attributes from curated lists.

use crate::rng::SheetRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn full_name(rng: &mut SheetRng) -> String {
        format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES))
    }

    /// Lowercased "first.last@domain" built from a full name.
    pub fn email_for(name: &str, domain: &str) -> String {
        let local = name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(".");
        format!("{local}@{domain}")
    }

    /// A ten-digit mobile number starting 6-9.
    pub fn mobile_number(rng: &mut SheetRng) -> String {
        let lead = 6 + rng.next_u64_below(4);
        let rest = rng.next_u64_below(1_000_000_000);
        format!("{lead}{rest:09}")
    }

    pub fn year(rng: &mut SheetRng) -> &'static str {
        *rng.pick(YEARS)
    }

    pub fn dept(rng: &mut SheetRng) -> &'static str {
        *rng.pick(DEPTS)
    }
}

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Aditi", "Akash", "Ananya", "Arjun", "Divya", "Farah", "Gaurav",
    "Ishaan", "Jasmine", "John", "Kavya", "Keerthi", "Lakshmi", "Manoj", "Meera",
    "Mohammed", "Nikhil", "Nisha", "Pooja", "Pranav", "Priya", "Rahul", "Riya",
    "Rohan", "Sahana", "Sanjay", "Sneha", "Suresh", "Tanvi", "Varun", "Vikram",
];

const LAST_NAMES: &[&str] = &[
    "Iyer", "Khan", "Kumar", "Menon", "Nair", "Patel", "Pillai", "Rao",
    "Reddy", "Shah", "Sharma", "Singh", "Thomas", "Varma", "Verma", "Joseph",
];

const YEARS: &[&str] = &["I", "II", "III", "IV"];

const DEPTS: &[&str] = &["CSE", "ECE", "EEE", "MECH", "CIVIL", "IT", "MBA"];
