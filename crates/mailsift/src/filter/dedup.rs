//! First-occurrence-wins deduplication against the sent-mail oracle.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{MailsiftError, Result};
use crate::input::{Row, RowStream};
use crate::oracle::SentOracle;
use crate::output::OutputTable;

use super::stats::{CancelFlag, FilterStats, RowDecision};

/// Lowercased, trimmed form of an address cell.
///
/// This is the dedup and lookup key; the original cell text is what gets
/// written when a row is kept.
pub fn normalize_address(cell: &str) -> String {
    cell.trim().to_lowercase()
}

/// Result of a filter run.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Header plus kept rows.
    pub table: OutputTable,
    /// Per-decision counters.
    pub stats: FilterStats,
}

/// Streams rows, drops repeats and already-contacted addresses, keeps the rest.
///
/// The oracle is queried exactly once per distinct non-empty address, on
/// first sight, in row order. Later rows with the same address are dropped
/// whatever the oracle would have said about them.
pub struct DeduplicatingFilter<'o> {
    oracle: &'o dyn SentOracle,
    cancel: Option<CancelFlag>,
}

impl<'o> DeduplicatingFilter<'o> {
    /// Create a filter that consults the given oracle.
    pub fn new(oracle: &'o dyn SentOracle) -> Self {
        Self {
            oracle,
            cancel: None,
        }
    }

    /// Stop at the next row boundary once this flag is raised.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Consume the row stream and build the output table.
    ///
    /// Row decode errors and cancellation abort the run; lookup failures
    /// and short rows never do.
    pub fn run(
        &self,
        header: Row,
        rows: RowStream<'_>,
        address_index: usize,
    ) -> Result<FilterOutcome> {
        let mut table = OutputTable::new(header);
        let mut stats = FilterStats::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (offset, row) in rows.enumerate() {
            if self.is_cancelled() {
                info!(rows_read = stats.rows_read, "filter run cancelled");
                return Err(MailsiftError::Cancelled);
            }

            let row = row?;
            // 1-based, counting the header line.
            let line = offset + 2;

            let decision = self.decide(&row, address_index, line, &mut seen, &mut stats);
            stats.record(decision);

            if decision == RowDecision::Kept {
                table.push(row);
            }
        }

        info!(
            oracle = self.oracle.name(),
            rows_read = stats.rows_read,
            kept = stats.kept,
            already_sent = stats.already_sent,
            duplicates = stats.duplicates,
            blank = stats.blank_addresses,
            ragged = stats.ragged_rows,
            oracle_failures = stats.oracle_failures,
            "filter run complete"
        );

        Ok(FilterOutcome { table, stats })
    }

    fn decide(
        &self,
        row: &Row,
        address_index: usize,
        line: usize,
        seen: &mut HashSet<String>,
        stats: &mut FilterStats,
    ) -> RowDecision {
        let Some(cell) = row.get(address_index) else {
            debug!(line, cells = row.len(), "row has no address cell, skipping");
            return RowDecision::Ragged;
        };

        // Empty addresses are never remembered.
        let address = normalize_address(cell);
        if address.is_empty() {
            debug!(line, "blank address, skipping");
            return RowDecision::BlankAddress;
        }

        if seen.contains(&address) {
            debug!(line, %address, "duplicate address, skipping");
            return RowDecision::Duplicate;
        }
        seen.insert(address.clone());

        stats.oracle_queries += 1;
        match self.oracle.is_already_sent(&address) {
            Ok(true) => {
                debug!(line, %address, "already sent, dropping");
                RowDecision::AlreadySent
            }
            Ok(false) => RowDecision::Kept,
            Err(e) => {
                // Treated as not sent.
                stats.oracle_failures += 1;
                warn!(line, oracle = self.oracle.name(), "sent-mail lookup failed, keeping row");
                debug!(line, %address, error = %e, "lookup failure detail");
                RowDecision::Kept
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}
