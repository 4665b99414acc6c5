//! Address normalization, deduplication, and sent-status filtering.

mod dedup;
mod stats;

pub use dedup::{DeduplicatingFilter, FilterOutcome, normalize_address};
pub use stats::{CancelFlag, FilterStats, RowDecision};
