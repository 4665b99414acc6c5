//! Fuzz target for the tabular reader.
//!
//! This fuzzer tests that the reader:
//! 1. Never panics on malformed CSV or XLSX bytes
//! 2. Surfaces row errors instead of aborting the process
//! 3. Doesn't allocate unbounded memory

#![no_main]

use libfuzzer_sys::fuzz_target;
use mailsift::{InputKind, TabularReader};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let reader = TabularReader::new();
    for kind in [InputKind::Delimited, InputKind::Spreadsheet] {
        if let Ok(tabular) = reader.read(data, kind) {
            for row in tabular.rows {
                let _ = row;
            }
        }
    }
});
