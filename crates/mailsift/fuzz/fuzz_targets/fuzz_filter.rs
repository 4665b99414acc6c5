//! Fuzz target for the filter pipeline.
//!
//! Builds a mailing list from structured input and checks that no kept row
//! shares a normalized address with another, and that each address is
//! looked up at most once.

#![no_main]

use std::collections::HashSet;
use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mailsift::{Mailsift, StaticOracle, normalize_address};

#[derive(Debug, Arbitrary)]
struct Input {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    sent: Vec<String>,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 1_000 {
        return;
    }

    let mut csv = String::from("email");
    for cell in &input.header {
        csv.push(',');
        csv.push_str(&quote(cell));
    }
    csv.push('\n');
    for row in &input.rows {
        let line: Vec<String> = row.iter().map(|cell| quote(cell)).collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }

    let oracle = Arc::new(StaticOracle::with_sent(&input.sent));
    let mailsift = Mailsift::with_shared_oracle(oracle.clone());

    if let Ok(report) = mailsift.filter_bytes("fuzz.csv", csv.as_bytes()) {
        let mut seen = HashSet::new();
        for row in &report.table.rows {
            assert!(seen.insert(normalize_address(&row[report.address_column])));
        }

        let queries = oracle.queries();
        let distinct: HashSet<&String> = queries.iter().collect();
        assert_eq!(distinct.len(), queries.len());
    }
});

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
