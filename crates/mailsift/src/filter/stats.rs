//! Per-run counters and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// What happened to one data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowDecision {
    /// Address not yet contacted; the row is written.
    Kept,
    /// The oracle reported the address as already mailed.
    AlreadySent,
    /// An earlier row already decided this address.
    Duplicate,
    /// Address cell empty after trimming.
    BlankAddress,
    /// Row too short to have an address cell.
    Ragged,
}

/// Counters for one filter run.
///
/// `rows_read` always equals the sum of the five decision counters, and
/// every oracle query ends in `kept` or `already_sent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub rows_read: usize,
    pub kept: usize,
    pub already_sent: usize,
    pub duplicates: usize,
    pub blank_addresses: usize,
    pub ragged_rows: usize,
    pub oracle_queries: usize,
    pub oracle_failures: usize,
}

impl FilterStats {
    /// Count one row's decision.
    pub fn record(&mut self, decision: RowDecision) {
        self.rows_read += 1;
        match decision {
            RowDecision::Kept => self.kept += 1,
            RowDecision::AlreadySent => self.already_sent += 1,
            RowDecision::Duplicate => self.duplicates += 1,
            RowDecision::BlankAddress => self.blank_addresses += 1,
            RowDecision::Ragged => self.ragged_rows += 1,
        }
    }

    /// Rows that did not make it into the output.
    pub fn dropped(&self) -> usize {
        self.rows_read - self.kept
    }

    /// Distinct non-empty addresses seen.
    pub fn distinct_addresses(&self) -> usize {
        self.oracle_queries
    }
}

/// Shared flag that stops a run at the next row boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_totals_consistent() {
        let mut stats = FilterStats::default();
        for decision in [
            RowDecision::Kept,
            RowDecision::AlreadySent,
            RowDecision::Duplicate,
            RowDecision::Duplicate,
            RowDecision::BlankAddress,
            RowDecision::Ragged,
        ] {
            stats.record(decision);
        }

        assert_eq!(stats.rows_read, 6);
        assert_eq!(stats.duplicates, 2);
        assert_eq!(stats.dropped(), 5);
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());

        handle.cancel();
        assert!(flag.is_cancelled());
    }
}
