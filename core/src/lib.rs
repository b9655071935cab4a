//! FeeDesk core: strict student fee sheets and the rules that keep them
//! consistent.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod journal;
pub mod name_generator;
pub mod query;
pub mod record;
pub mod record_store;
pub mod reminder;
pub mod report;
pub mod rng;
pub mod rules;
pub mod sample;
pub mod schema;
pub mod session;
pub mod sheet;
pub mod table;
pub mod types;

pub use error::{IndexError, LedgerError, LedgerResult, SchemaError};
pub use record::{FeeRecord, ParseWarning};
pub use session::FeeSession;
