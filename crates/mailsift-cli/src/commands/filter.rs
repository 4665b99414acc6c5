//! Filter command - drop duplicate and already-contacted rows from a list.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use mailsift::{CancelFlag, Mailsift, MailsiftConfig, OutputFormat};

use crate::cli::OracleArgs;

use super::build_oracle;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    oracle: OracleArgs,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate input file exists
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let oracle = build_oracle(&oracle)?;
    let mailsift = Mailsift::with_shared_oracle(oracle).with_config(MailsiftConfig {
        output_format: format,
        ..MailsiftConfig::default()
    });

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || handler_flag.cancel())?;

    if !json_output {
        println!(
            "{} {} {}",
            "Filtering".cyan().bold(),
            file.display().to_string().white(),
            format!("(oracle: {})", mailsift.oracle_name()).dimmed()
        );
    }

    let bytes = fs::read(&file)?;
    let file_name = file
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let report = mailsift.filter_bytes_with_cancel(&file_name, &bytes, cancel)?;

    let output_path = output.unwrap_or_else(|| default_output_path(&file, format));
    fs::write(&output_path, mailsift.render(&report)?)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = &report.stats;
    println!();
    println!(
        "Read {} rows: {} kept, {} already sent, {} duplicates",
        stats.rows_read.to_string().white().bold(),
        stats.kept.to_string().green(),
        stats.already_sent.to_string().yellow(),
        stats.duplicates.to_string().yellow()
    );

    if verbose || stats.blank_addresses > 0 || stats.ragged_rows > 0 {
        println!(
            "Skipped {} rows without an address ({} blank, {} short)",
            (stats.blank_addresses + stats.ragged_rows).to_string().white(),
            stats.blank_addresses,
            stats.ragged_rows
        );
    }

    if stats.oracle_failures > 0 {
        println!(
            "{} {} lookups failed; those rows were kept",
            "Warning:".yellow(),
            stats.oracle_failures
        );
    }

    if verbose {
        println!(
            "Address column: {} ({})",
            report.address_column,
            report.table.header[report.address_column]
        );
        println!("Source hash: {}", report.source.hash);
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    if report.table.is_header_only() {
        println!("{}", "Every address was already contacted.".yellow());
    }

    Ok(())
}

/// `<dir>/<stem>_filtered.<ext>` next to the input.
fn default_output_path(file: &Path, format: OutputFormat) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}_filtered.{}", stem, format.extension()))
}
