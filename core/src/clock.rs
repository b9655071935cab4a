//! Calendar source for the business rules.
//!
//! RULE: Nothing in the rule engine reads the system clock directly.
//! "Today" always comes through a Clock so recompute stays reproducible.

use chrono::{Local, NaiveDate};

pub trait Clock {
    /// The current calendar date, used to stamp Fee Paid On.
    fn today(&self) -> NaiveDate;
}

/// The local calendar date of the machine running the desk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date. Used by tests and replay tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
