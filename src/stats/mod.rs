pub mod aggregate;
pub mod fetch;
pub mod loc;

pub use aggregate::{shift_hour, Aggregated, Aggregator, HourlyHistogram, Ledger, LedgerEntry};
pub use fetch::{fetch_contributors, fetch_languages, fetch_punch_card, fetch_two_pass, warm_stats};
pub use loc::{LocCounter, SccEntry};
