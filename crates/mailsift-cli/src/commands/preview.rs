//! Preview command - show the header and first rows of a file.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use mailsift::input::locate_address_column;
use mailsift::{InputKind, Mailsift, StaticOracle};

pub fn run(file: PathBuf, rows: usize, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let kind = InputKind::from_path(&file)?;
    let bytes = fs::read(&file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

    // Previews never consult the oracle.
    let mailsift = Mailsift::new(StaticOracle::new());
    let preview = mailsift.preview(kind, &bytes, Some(rows))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    let address_column = locate_address_column(&preview.headers).ok();

    println!(
        "{} {} ({})",
        "Preview".cyan().bold(),
        file.display().to_string().white(),
        kind
    );
    println!();

    let header: Vec<String> = preview
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if Some(i) == address_column {
                h.green().bold().to_string()
            } else {
                h.bold().to_string()
            }
        })
        .collect();
    println!("  {}", header.join(" | "));

    for row in &preview.rows {
        println!("  {}", row.join(" | "));
    }

    if preview.truncated {
        println!("  {}", "...".dimmed());
    }

    println!();
    match address_column {
        Some(i) => println!("Address column: {}", preview.headers[i].green()),
        None => println!(
            "{} No 'email' column found; this file cannot be filtered",
            "Warning:".yellow()
        ),
    }

    Ok(())
}
